//! Output Module
//!
//! 区切り文字列を`.docx`ファイルとして書き出す。

mod docx;

use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::XlsxToDocxError;

pub use docx::{read_paragraphs, DocxWriter};

/// 出力ファイルの拡張子
pub const DOCX_EXTENSION: &str = "docx";

/// 出力ファイル名を組み立てる（`<dir>/<name>.docx`）
///
/// `name`の拡張子は検証せず、常に`.docx`を付け足します。
pub fn document_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, DOCX_EXTENSION))
}

/// `text`を1段落として、作業ディレクトリの`<name>.docx`に書き出す
///
/// 同名のファイルが存在する場合は確認せずに上書きします。
///
/// # 戻り値
///
/// * `Ok(PathBuf)` - 書き出したファイルのパス
/// * `Err(XlsxToDocxError::Io)` - ファイルを作成できない場合
pub fn write_document(text: &str, name: &str) -> Result<PathBuf, XlsxToDocxError> {
    write_document_in(Path::new(""), text, name)
}

/// `write_document`の出力先ディレクトリを指定する版
pub fn write_document_in(dir: &Path, text: &str, name: &str) -> Result<PathBuf, XlsxToDocxError> {
    let path = document_path(dir, name);
    let file = File::create(&path)?;
    DocxWriter::new().write(text, file)?.sync_all()?;
    debug!(path = %path.display(), "document saved");
    Ok(path)
}
