//! Parser Module
//!
//! calamineを使用したワークブックの読み込みと表の構築。

mod workbook;

pub use workbook::WorkbookParser;
