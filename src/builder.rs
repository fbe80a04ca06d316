//! Builder Module
//!
//! Fluent Builder APIを提供し、`Translator`インスタンスを段階的に構築する。

use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::api::{Field, Language};
use crate::error::XlsxToDocxError;
use crate::formatter::delimit;
use crate::output::{write_document_in, DocxWriter};
use crate::parser::WorkbookParser;
use crate::sorter::get_field;
use crate::types::Table;

/// 既定のシート名
pub const DEFAULT_SHEET_NAME: &str = "main";

/// Excelのシート名の最大長
const MAX_SHEET_NAME_LEN: usize = 31;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TranslationConfig {
    /// 読み込むシート名
    pub sheet_name: String,

    /// 取得対象フィールド
    pub target_field: Field,

    /// 並べ替えフィールド
    pub sorting_field: Field,

    /// 出力言語
    pub language: Language,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            target_field: Field::LocaleEn,
            sorting_field: Field::default(),
            language: Language::En,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxdocx::{Field, Language, TranslatorBuilder};
///
/// # fn main() -> Result<(), xlsxdocx::XlsxToDocxError> {
/// let translator = TranslatorBuilder::new()
///     .with_target_field(Field::LocaleEs)
///     .with_sorting_field(Field::SortingId1)
///     .with_language(Language::Es)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct TranslatorBuilder {
    /// 内部設定（構築中）
    config: TranslationConfig,
}

impl TranslatorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート名: `main`
    /// - 取得対象フィールド: `locale_en_US`
    /// - 並べ替えフィールド: `locale_en_US`
    /// - 出力言語: 英語
    pub fn new() -> Self {
        Self::default()
    }

    /// 読み込むシート名を指定する
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.config.sheet_name = name.into();
        self
    }

    /// 段落に出力するフィールドを指定する
    pub fn with_target_field(mut self, field: Field) -> Self {
        self.config.target_field = field;
        self
    }

    /// 並べ替えに使うフィールドを指定する
    pub fn with_sorting_field(mut self, field: Field) -> Self {
        self.config.sorting_field = field;
        self
    }

    /// 出力言語（ラベル）を指定する
    pub fn with_language(mut self, language: Language) -> Self {
        self.config.language = language;
        self
    }

    /// 設定を検証し、`Translator`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `XlsxToDocxError::Config(String)`: シート名が空、または31文字を超える場合
    pub fn build(self) -> Result<Translator, XlsxToDocxError> {
        let name = &self.config.sheet_name;
        if name.trim().is_empty() {
            return Err(XlsxToDocxError::Config(
                "Sheet name must not be empty".to_string(),
            ));
        }

        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(XlsxToDocxError::Config(format!(
                "Sheet name '{}' is longer than {} characters",
                name, MAX_SHEET_NAME_LEN
            )));
        }

        Ok(Translator {
            config: self.config,
        })
    }
}

/// 変換処理のファサード
///
/// 表の読み込み → 並べ替え → フィールド取得 → 区切り文字列化 → DOCX出力を実行します。
/// 表は1回だけ解析し、並べ替えと取得で同じ値を使います。
#[derive(Debug, Clone)]
pub struct Translator {
    config: TranslationConfig,
}

impl Translator {
    pub fn sheet_name(&self) -> &str {
        &self.config.sheet_name
    }

    pub fn target_field(&self) -> Field {
        self.config.target_field
    }

    pub fn sorting_field(&self) -> Field {
        self.config.sorting_field
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    /// ワークブックを開き、設定されたシートを`Table`に変換する
    pub fn load_table<R: Read>(&self, input: R) -> Result<Table, XlsxToDocxError> {
        let mut parser = WorkbookParser::open(input)?;
        parser.parse_table(&self.config.sheet_name)
    }

    /// 解析済みの`Table`から段落テキストを生成する
    pub fn render(&self, table: &Table) -> Result<String, XlsxToDocxError> {
        let values = get_field(table, self.config.target_field, self.config.sorting_field)?;
        let text = delimit(&values, self.config.language);
        debug!(
            target_field = %self.config.target_field,
            sorting_field = %self.config.sorting_field,
            language = %self.config.language,
            values = values.len(),
            "paragraph rendered"
        );
        Ok(text)
    }

    /// ワークブックから段落テキストを生成する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use std::fs::File;
    /// use xlsxdocx::TranslatorBuilder;
    ///
    /// # fn main() -> Result<(), xlsxdocx::XlsxToDocxError> {
    /// let translator = TranslatorBuilder::new().build()?;
    /// let text = translator.translate(File::open("sample_data.xlsx")?)?;
    /// println!("{}", text);
    /// # Ok(())
    /// # }
    /// ```
    pub fn translate<R: Read>(&self, input: R) -> Result<String, XlsxToDocxError> {
        let table = self.load_table(input)?;
        self.render(&table)
    }

    /// ワークブックを変換し、1段落のDOCXとして`output`に書き出す
    pub fn translate_to_docx<R: Read, W: Write + Seek>(
        &self,
        input: R,
        output: W,
    ) -> Result<W, XlsxToDocxError> {
        let text = self.translate(input)?;
        DocxWriter::new().write(&text, output)
    }

    /// ワークブックを変換し、作業ディレクトリの`<name>.docx`に書き出す
    pub fn translate_to_file<R: Read>(
        &self,
        input: R,
        name: &str,
    ) -> Result<PathBuf, XlsxToDocxError> {
        self.translate_to_file_in(input, Path::new(""), name)
    }

    /// `translate_to_file`の出力先ディレクトリを指定する版
    pub fn translate_to_file_in<R: Read>(
        &self,
        input: R,
        dir: &Path,
        name: &str,
    ) -> Result<PathBuf, XlsxToDocxError> {
        let text = self.translate(input)?;
        write_document_in(dir, &text, name)
    }
}
