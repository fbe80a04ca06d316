//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDate};

use crate::api::Field;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 数値（整数セルも含む）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// 日付（Excelのシリアル値、1900年システム）
    DateTime(f64),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 値の種類を表す名前（エラーメッセージ用）
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Number(_) => "number",
            CellValue::String(_) => "text",
            CellValue::Bool(_) => "boolean",
            CellValue::DateTime(_) => "date",
            CellValue::Error(_) => "error",
            CellValue::Empty => "empty",
        }
    }

    /// 同じ種類の値同士を比較する
    ///
    /// 種類が異なる場合は`None`を返します（暗黙の型変換は行わない）。
    pub fn compare(&self, other: &CellValue) -> Option<Ordering> {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => Some(compare_f64(*a, *b)),
            (CellValue::DateTime(a), CellValue::DateTime(b)) => Some(compare_f64(*a, *b)),
            (CellValue::String(a), CellValue::String(b)) => Some(a.cmp(b)),
            (CellValue::Bool(a), CellValue::Bool(b)) => Some(a.cmp(b)),
            (CellValue::Error(a), CellValue::Error(b)) => Some(a.cmp(b)),
            (CellValue::Empty, CellValue::Empty) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

/// 数値の全順序比較（`-0.0`と`0.0`は等しい）
fn compare_f64(a: f64, b: f64) -> Ordering {
    fn canonical(x: f64) -> f64 {
        if x == 0.0 {
            0.0
        } else {
            x
        }
    }
    canonical(a).total_cmp(&canonical(b))
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl fmt::Display for CellValue {
    /// 段落に出力する文字列表現
    ///
    /// 整数値の数値は小数点なし（`3.0` → `3`）、空セルは空文字列、
    /// 日付はISO 8601（`YYYY-MM-DD`）で出力します。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) => f.write_str(s),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(serial) => match serial_to_date(*serial) {
                Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
                None => write!(f, "{}", serial),
            },
            CellValue::Error(e) => f.write_str(e),
            CellValue::Empty => Ok(()),
        }
    }
}

/// Excelのシリアル値を日付に変換（1900年システム、1899年12月30日起算）
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::try_days(serial.floor() as i64)?)
}

/// 1行分のレコード
///
/// B〜F列の5つのフィールドと、元の行番号（1始まり）を保持します。
/// 欠けているセルは`CellValue::Empty`として常に5つ揃っています。
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    row: u32,
    fields: [CellValue; 5],
}

impl Record {
    /// 新しいレコードを生成
    pub fn new(row: u32, fields: [CellValue; 5]) -> Self {
        Self { row, fields }
    }

    /// スプレッドシート上の行番号（1始まり）
    pub fn row(&self) -> u32 {
        self.row
    }

    /// 指定フィールドの値
    pub fn get(&self, field: Field) -> &CellValue {
        &self.fields[field.index()]
    }

    pub fn fields(&self) -> &[CellValue; 5] {
        &self.fields
    }
}

/// 行番号からレコードへのマッピング
///
/// 反復順は常に行番号の昇順（スプレッドシートの行順）です。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: BTreeMap<u32, Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// レコードを追加する
    ///
    /// 同じ行番号のレコードが既に存在する場合は置き換え、古いレコードを返します。
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.row, record)
    }

    /// 行番号でレコードを取得
    pub fn get(&self, row: u32) -> Option<&Record> {
        self.records.get(&row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 行順にレコードを走査
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut table = Table::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}
