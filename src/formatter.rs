//! Delimiter Formatter Module
//!
//! 値の列を、言語ラベル付きのカンマ区切り・ピリオド終端の1文字列にまとめる。

use std::fmt::{Display, Write};

use crate::api::Language;
use crate::error::XlsxToDocxError;

/// 値と値の区切り
const SEPARATOR: &str = ", ";

/// 値の列を区切り文字列に変換する
///
/// `"<LABEL>: v1, v2, ..., vN."`の形式で出力します。
/// LABELは英語・フランス語で`INGREDIENTS`、スペイン語で`INGREDIENTES`です。
/// 値が1つもない場合は`"<LABEL>: ."`を返します。
///
/// # 使用例
///
/// ```rust
/// use xlsxdocx::{delimit, Language};
///
/// assert_eq!(delimit(["a", "b", "c"], Language::En), "INGREDIENTS: a, b, c.");
/// assert_eq!(delimit(Vec::<String>::new(), Language::Es), "INGREDIENTES: .");
/// ```
pub fn delimit<I>(values: I, language: Language) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut out = format!("{}: ", language.label());
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            out.push_str(SEPARATOR);
        }
        // Stringへの書き込みは失敗しない
        let _ = write!(out, "{}", value);
    }
    out.push('.');
    out
}

/// 言語タグ（`en` / `fr` / `es`）を受け取る版の`delimit`
///
/// # エラー
///
/// * `UnsupportedLanguage` - タグが`en` / `fr` / `es`のいずれでもない場合
pub fn delimit_tag<I>(values: I, tag: &str) -> Result<String, XlsxToDocxError>
where
    I: IntoIterator,
    I::Item: Display,
{
    let language: Language = tag.parse()?;
    Ok(delimit(values, language))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    #[test]
    fn test_delimit_english() {
        assert_eq!(delimit(["a", "b", "c"], Language::En), "INGREDIENTS: a, b, c.");
    }

    #[test]
    fn test_delimit_french_uses_english_label() {
        assert_eq!(delimit(["sel", "sucre"], Language::Fr), "INGREDIENTS: sel, sucre.");
    }

    #[test]
    fn test_delimit_spanish() {
        assert_eq!(delimit(["a", "b", "c"], Language::Es), "INGREDIENTES: a, b, c.");
    }

    #[test]
    fn test_delimit_single_value() {
        assert_eq!(delimit(["water"], Language::En), "INGREDIENTS: water.");
    }

    #[test]
    fn test_delimit_empty() {
        let empty: Vec<&str> = Vec::new();
        assert_eq!(delimit(empty.clone(), Language::En), "INGREDIENTS: .");
        assert_eq!(delimit(empty, Language::Es), "INGREDIENTES: .");
    }

    #[test]
    fn test_delimit_cell_values() {
        let values = vec![
            CellValue::Number(1.0),
            CellValue::Number(2.5),
            CellValue::Empty,
            CellValue::from("salt"),
        ];
        assert_eq!(delimit(&values, Language::En), "INGREDIENTS: 1, 2.5, , salt.");
    }

    #[test]
    fn test_delimit_tag() {
        assert_eq!(
            delimit_tag(["a", "b", "c"], "es").unwrap(),
            "INGREDIENTES: a, b, c."
        );
        assert_eq!(delimit_tag(["a"], "fr").unwrap(), "INGREDIENTS: a.");
    }

    #[test]
    fn test_delimit_tag_unsupported() {
        for tag in ["de", "EN", "", "es-ES"] {
            match delimit_tag(["a"], tag) {
                Err(XlsxToDocxError::UnsupportedLanguage(t)) => assert_eq!(t, tag),
                other => panic!("Expected UnsupportedLanguage for {:?}, got {:?}", tag, other),
            }
        }
    }
}
