//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

use crate::api::Field;

/// xlsxdocxクレート全体で使用するエラー型
///
/// シートの読み込み、並べ替え、区切り文字列の生成、DOCX出力、
/// 対話プロンプトの各段階で発生するエラーを統一的に扱います。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイルの書き込み失敗など）
/// - `Parse`: Excelファイルの解析中に発生したエラー（calamine由来）
/// - `MalformedSheet`: シートが空、または必要な列が存在しない
/// - `HeterogeneousField`: 並べ替え対象の列に異なる型の値が混在している
/// - `UnsupportedLanguage`: en / fr / es 以外の言語タグ
/// - `InputClosed` / `TooManyAttempts`: 対話プロンプトの中断
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxdocx::XlsxToDocxError;
/// use std::fs::File;
///
/// fn open_input(path: &str) -> Result<File, XlsxToDocxError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(file)
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxToDocxError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// ZIPアーカイブの読み書きエラー（DOCXコンテナ）
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// XMLの読み書きエラー（word/document.xmlなど）
    #[error("XML error: {0}")]
    Xml(String),

    /// 設定の検証に失敗したエラー
    ///
    /// 存在しないシート名や、空のシート名が指定された場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// シートの形式が想定と異なる
    ///
    /// シートが空（`max_row`が存在しない）場合や、B〜F列が揃っていない場合に発生します。
    #[error("Malformed sheet '{sheet}': {message}")]
    MalformedSheet {
        /// シート名
        sheet: String,
        /// エラーの詳細メッセージ
        message: String,
    },

    /// 並べ替え対象の列に型の異なる値が混在している
    ///
    /// 数値と文字列などを暗黙に変換して比較することはしません。
    #[error("Heterogeneous field {field}: row {row} holds {found}, expected {expected}")]
    HeterogeneousField {
        /// 並べ替え対象のフィールド
        field: Field,
        /// 最初に型が食い違った行番号（1始まり）
        row: u32,
        /// 列の先頭レコードの値の種類
        expected: &'static str,
        /// 実際に見つかった値の種類
        found: &'static str,
    },

    /// サポートされていない言語タグ
    #[error("Unsupported language: '{0}' (expected en, fr or es)")]
    UnsupportedLanguage(String),

    /// 対話入力が途中で終了した（EOF）
    #[error("Input closed while waiting for {0}")]
    InputClosed(&'static str),

    /// 再入力の上限回数を超えた
    #[error("Too many invalid answers for {prompt} (limit: {limit})")]
    TooManyAttempts {
        /// プロンプトの種類
        prompt: &'static str,
        /// 許容される最大回数
        limit: u32,
    },

    /// リソース制限に違反したエラー
    ///
    /// 入力ファイルサイズの上限や、DOCX読み戻し時のZIP展開サイズ上限などに
    /// 違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}
