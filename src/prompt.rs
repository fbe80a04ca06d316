//! Prompt Module
//!
//! 対話プロンプトで取得対象フィールド、並べ替えフィールド、出力言語、
//! 出力ファイル名を順に尋ねる。

use std::io::{BufRead, Write};
use tracing::warn;

use crate::api::{Field, Language};
use crate::error::XlsxToDocxError;

/// 認識できない回答に対するメッセージ
const UNRECOGNIZED: &str = "Sorry, don't recognize that number.";

/// コマンドライン等で事前に決まっている回答
///
/// `Some`の項目は質問を省略します。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preset {
    pub target_field: Option<Field>,
    pub sorting_field: Option<Field>,
    pub language: Option<Language>,
    pub document_name: Option<String>,
}

/// すべての質問への回答
#[derive(Debug, Clone, PartialEq)]
pub struct Choices {
    pub target_field: Field,
    pub sorting_field: Field,
    pub language: Language,
    /// 拡張子なしの出力ファイル名
    pub document_name: String,
}

/// 対話プロンプト
///
/// 入力と出力を差し替えられるため、テストではメモリ上のバッファを使えます。
/// 認識できない回答には毎回メッセージを表示して再度尋ねます。
pub struct Prompter<R, W> {
    input: R,
    output: W,
    /// 1つの質問に対する最大回答回数（`None`は無制限）
    max_attempts: Option<u32>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_attempts: None,
        }
    }

    /// 1つの質問に対する最大回答回数を指定する
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// 起動時の案内を表示する
    pub fn banner(&mut self) -> Result<(), XlsxToDocxError> {
        writeln!(self.output, "----------------------------")?;
        writeln!(self.output, "| Excel to Word Translator |")?;
        writeln!(self.output, "----------------------------")?;
        writeln!(
            self.output,
            "Parses and sorts an .xlsx file and outputs contents as a .docx file as comma-delimited paragraph.\n"
        )?;
        writeln!(self.output, "- .docx file will be output in the current directory.\n")?;
        writeln!(self.output, "Press CTRL+C to cancel.\n")?;
        writeln!(
            self.output,
            "#########################################################\n"
        )?;
        Ok(())
    }

    /// 未回答の項目だけを順に尋ねる
    pub fn collect(&mut self, preset: Preset) -> Result<Choices, XlsxToDocxError> {
        let target_field = match preset.target_field {
            Some(field) => field,
            None => self.ask_target_field()?,
        };
        let sorting_field = match preset.sorting_field {
            Some(field) => field,
            None => self.ask_sorting_field()?,
        };
        let language = match preset.language {
            Some(language) => language,
            None => self.ask_language()?,
        };
        let document_name = match preset.document_name {
            Some(name) => name,
            None => self.ask_document_name()?,
        };

        Ok(Choices {
            target_field,
            sorting_field,
            language,
            document_name,
        })
    }

    pub fn ask_target_field(&mut self) -> Result<Field, XlsxToDocxError> {
        let question = field_menu("Enter the field to retrieve.", "To retrieve");
        self.ask("target field", &question, Field::from_menu)
    }

    pub fn ask_sorting_field(&mut self) -> Result<Field, XlsxToDocxError> {
        let question = format!("\n{}", field_menu("Enter the field to sort by.", "To sort by"));
        self.ask("sorting field", &question, Field::from_menu)
    }

    pub fn ask_language(&mut self) -> Result<Language, XlsxToDocxError> {
        let question = "\nEnter the display language.\n\tEnglish = 1\n\tFrench = 2\n\tSpanish = 3\n>> ";
        self.ask("display language", question, Language::from_menu)
    }

    /// 出力ファイル名（拡張子なし）を尋ねる
    ///
    /// 入力内容は検証せず、行末の改行だけを取り除きます。
    pub fn ask_document_name(&mut self) -> Result<String, XlsxToDocxError> {
        write!(
            self.output,
            "\nEnter the output file name WITHOUT the file extension.\n\t(Entering \"test\" will save a file called \"test.docx\").\n>> "
        )?;
        self.output.flush()?;
        let line = self.read_line("output file name")?;
        Ok(line.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string())
    }

    /// 入力と出力を取り出す
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn ask<T>(
        &mut self,
        prompt: &'static str,
        question: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, XlsxToDocxError> {
        let mut attempts = 0u32;
        loop {
            write!(self.output, "{}", question)?;
            self.output.flush()?;

            let answer = self.read_answer(prompt)?;
            if let Some(value) = parse(&answer) {
                return Ok(value);
            }

            attempts += 1;
            warn!(prompt, answer = %answer, attempts, "unrecognized answer");
            writeln!(self.output, "\n{}", UNRECOGNIZED)?;

            if let Some(limit) = self.max_attempts {
                if attempts >= limit {
                    return Err(XlsxToDocxError::TooManyAttempts { prompt, limit });
                }
            }
        }
    }

    /// 1行読み込み、前後の空白と改行を取り除く
    fn read_answer(&mut self, prompt: &'static str) -> Result<String, XlsxToDocxError> {
        Ok(self.read_line(prompt)?.trim().to_string())
    }

    /// 1行をそのまま読み込む（EOFは`InputClosed`）
    fn read_line(&mut self, prompt: &'static str) -> Result<String, XlsxToDocxError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(XlsxToDocxError::InputClosed(prompt));
        }
        Ok(line)
    }
}

/// フィールド選択メニューの文言を組み立てる
fn field_menu(title: &str, example: &str) -> String {
    let mut menu = format!("{}\n", title);
    for (i, field) in Field::ALL.iter().enumerate() {
        menu.push_str(&format!("\t{} = {}\n", field, i + 1));
    }
    menu.push_str(&format!(
        "\t({} {}, enter 1)\n>> ",
        example,
        Field::SortingId1
    ));
    menu
}
