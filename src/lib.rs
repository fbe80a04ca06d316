//! xlsxdocx - 多言語の原材料表を並べ替え、1段落のWord文書に変換する
//!
//! Excelワークブック（XLSX）のシートから原材料レコードを読み込み、
//! 指定したフィールドで並べ替え、対象フィールドの値をカンマ区切りの
//! 1段落として`.docx`ファイルに書き出します。
//!
//! # シートの形式
//!
//! - 1行目はヘッダー、データは2行目から
//! - A列: 未使用（ID）
//! - B列: `sorting_id1`（数値）、C列: `sorting_id2`（数値）
//! - D〜F列: `locale_en_US`、`locale_fr_FR`、`locale_es_ES`（文字列）
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxdocx::{Field, Language, TranslatorBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let translator = TranslatorBuilder::new()
//!         .with_target_field(Field::LocaleEn)
//!         .with_sorting_field(Field::SortingId1)
//!         .with_language(Language::En)
//!         .build()?;
//!
//!     // "INGREDIENTS: a, b, c." を label.docx に書き出す
//!     translator.translate_to_file(File::open("sample_data.xlsx")?, "label")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # 個別の処理
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxdocx::{delimit, get_field, write_document, Field, Language, WorkbookParser};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut parser = WorkbookParser::open(File::open("sample_data.xlsx")?)?;
//!     let table = parser.parse_table("main")?;
//!
//!     let values = get_field(&table, Field::LocaleEs, Field::SortingId2)?;
//!     let text = delimit(&values, Language::Es);
//!     write_document(&text, "etiqueta")?;
//!
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod error;
mod formatter;
mod output;
mod parser;
mod prompt;
mod security;
mod sorter;
mod types;

// 公開API
pub use api::{Field, Language};
pub use builder::{Translator, TranslatorBuilder, DEFAULT_SHEET_NAME};
pub use error::XlsxToDocxError;
pub use formatter::{delimit, delimit_tag};
pub use output::{
    document_path, read_paragraphs, write_document, write_document_in, DocxWriter,
    DOCX_EXTENSION,
};
pub use parser::WorkbookParser;
pub use prompt::{Choices, Preset, Prompter};
pub use sorter::{get_field, sort_by_field};
pub use types::{CellValue, Record, Table};
