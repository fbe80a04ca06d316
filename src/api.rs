//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::fmt;
use std::str::FromStr;

use crate::error::XlsxToDocxError;

/// レコードのフィールド選択子
///
/// 取得対象フィールドと並べ替えフィールドの両方に使用します。
/// 対話メニューでは1〜5の番号で、レコード内では0〜4の位置で表されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Field {
    /// 並べ替えキー1（B列、数値）
    SortingId1,

    /// 並べ替えキー2（C列、数値）
    SortingId2,

    /// 英語ロケール（D列）
    #[default]
    LocaleEn,

    /// フランス語ロケール（E列）
    LocaleFr,

    /// スペイン語ロケール（F列）
    LocaleEs,
}

impl Field {
    /// メニュー番号順のすべてのフィールド
    pub const ALL: [Field; 5] = [
        Field::SortingId1,
        Field::SortingId2,
        Field::LocaleEn,
        Field::LocaleFr,
        Field::LocaleEs,
    ];

    /// レコード内の位置（0始まり）
    pub fn index(self) -> usize {
        match self {
            Field::SortingId1 => 0,
            Field::SortingId2 => 1,
            Field::LocaleEn => 2,
            Field::LocaleFr => 3,
            Field::LocaleEs => 4,
        }
    }

    /// 対話メニューの番号（1〜5）から選択子を取得
    ///
    /// 認識できない入力の場合は`None`を返します。
    pub fn from_menu(input: &str) -> Option<Self> {
        match input {
            "1" => Some(Field::SortingId1),
            "2" => Some(Field::SortingId2),
            "3" => Some(Field::LocaleEn),
            "4" => Some(Field::LocaleFr),
            "5" => Some(Field::LocaleEs),
            _ => None,
        }
    }

    /// スプレッドシート上の列名
    pub fn column_name(self) -> &'static str {
        match self {
            Field::SortingId1 => "sorting_id1",
            Field::SortingId2 => "sorting_id2",
            Field::LocaleEn => "locale_en_US",
            Field::LocaleFr => "locale_fr_FR",
            Field::LocaleEs => "locale_es_ES",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Field {
    type Err = XlsxToDocxError;

    /// メニュー番号（`"3"`）または列名（`"locale_en_US"`）を受け付ける
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Field::from_menu(s)
            .or_else(|| {
                Field::ALL
                    .into_iter()
                    .find(|field| field.column_name().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| XlsxToDocxError::Config(format!("Unknown field: '{}'", s)))
    }
}

/// 出力言語
///
/// 段落の先頭に付けるラベルを選択します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    /// 英語（`INGREDIENTS`）
    #[default]
    En,

    /// フランス語（`INGREDIENTS`）
    Fr,

    /// スペイン語（`INGREDIENTES`）
    Es,
}

impl Language {
    /// 対話メニューの番号（1〜3）から言語を取得
    pub fn from_menu(input: &str) -> Option<Self> {
        match input {
            "1" => Some(Language::En),
            "2" => Some(Language::Fr),
            "3" => Some(Language::Es),
            _ => None,
        }
    }

    /// 言語タグ（`en` / `fr` / `es`）
    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
        }
    }

    /// 段落の先頭に付けるラベル
    pub fn label(self) -> &'static str {
        match self {
            Language::En | Language::Fr => "INGREDIENTS",
            Language::Es => "INGREDIENTES",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = XlsxToDocxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            "es" => Ok(Language::Es),
            other => Err(XlsxToDocxError::UnsupportedLanguage(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_menu_mapping() {
        assert_eq!(Field::from_menu("1"), Some(Field::SortingId1));
        assert_eq!(Field::from_menu("3"), Some(Field::LocaleEn));
        assert_eq!(Field::from_menu("5"), Some(Field::LocaleEs));
        assert_eq!(Field::from_menu("0"), None);
        assert_eq!(Field::from_menu("6"), None);
        assert_eq!(Field::from_menu(" 1"), None);
    }

    #[test]
    fn test_field_index_matches_menu_order() {
        for (position, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), position);
        }
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("2".parse::<Field>().unwrap(), Field::SortingId2);
        assert_eq!("locale_fr_FR".parse::<Field>().unwrap(), Field::LocaleFr);
        assert_eq!("LOCALE_ES_ES".parse::<Field>().unwrap(), Field::LocaleEs);
        assert!(matches!(
            "unique_id".parse::<Field>(),
            Err(XlsxToDocxError::Config(_))
        ));
    }

    #[test]
    fn test_field_default_is_english_locale() {
        assert_eq!(Field::default(), Field::LocaleEn);
    }

    #[test]
    fn test_language_labels() {
        assert_eq!(Language::En.label(), "INGREDIENTS");
        assert_eq!(Language::Fr.label(), "INGREDIENTS");
        assert_eq!(Language::Es.label(), "INGREDIENTES");
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("es".parse::<Language>().unwrap(), Language::Es);
        for tag in ["de", "EN", "", "english", "1"] {
            match tag.parse::<Language>() {
                Err(XlsxToDocxError::UnsupportedLanguage(t)) => assert_eq!(t, tag),
                other => panic!("Expected UnsupportedLanguage for {:?}, got {:?}", tag, other),
            }
        }
    }

    #[test]
    fn test_language_menu_mapping() {
        assert_eq!(Language::from_menu("1"), Some(Language::En));
        assert_eq!(Language::from_menu("2"), Some(Language::Fr));
        assert_eq!(Language::from_menu("3"), Some(Language::Es));
        assert_eq!(Language::from_menu("4"), None);
    }
}
