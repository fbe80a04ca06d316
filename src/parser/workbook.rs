//! Workbook Parser
//!
//! calamineを使用したワークブックの読み込みと、シートから`Table`への変換。

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets, Xlsx};
use std::io::{Cursor, Read};
use tracing::debug;

use crate::error::XlsxToDocxError;
use crate::security::SecurityConfig;
use crate::types::{CellValue, Record, Table};

/// ヘッダー行（1始まり）。データはこの次の行から始まる
const HEADER_ROW: u32 = 1;

/// レコードの先頭列（0始まり、B列）。A列はIDとして読み飛ばす
const FIRST_FIELD_COL: u32 = 1;

/// レコードの最終列（0始まり、F列）
const LAST_FIELD_COL: u32 = 5;

/// ワークブックパーサー
///
/// calamineのラッパーとして、入力を一度だけメモリに読み込み、
/// 指定シートを`Table`に変換します。
pub struct WorkbookParser {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// # 引数
    ///
    /// * `reader` - Excelファイルを読み込むためのリーダー
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - 読み込みに成功した場合（XLSX形式のみ）
    /// * `Err(XlsxToDocxError::SecurityViolation)` - 入力サイズが上限を超えた場合
    /// * `Err(XlsxToDocxError::Parse)` - ワークブックとして解析できない場合
    pub fn open<R: Read>(reader: R) -> Result<Self, XlsxToDocxError> {
        let buffer = SecurityConfig::default().read_limited(reader)?;
        debug!(bytes = buffer.len(), "workbook loaded into memory");

        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer)).map_err(XlsxToDocxError::Parse)?;
        match sheets {
            Sheets::Xlsx(workbook) => Ok(Self { workbook }),
            _ => Err(XlsxToDocxError::Config(
                "Only XLSX format is supported".to_string(),
            )),
        }
    }

    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// シートを解析して`Table`を構築する
    ///
    /// 1行目はヘッダーとして読み飛ばし、2行目から最終データ行（`max_row`）までを
    /// 含めて読み込みます。各行のB〜F列が1つのレコードになり、キーは
    /// スプレッドシート上の行番号（1始まり）です。
    ///
    /// # エラー
    ///
    /// * `Config` - シートが存在しない場合
    /// * `MalformedSheet` - シートが空、またはF列まで届いていない場合
    pub fn parse_table(&mut self, sheet_name: &str) -> Result<Table, XlsxToDocxError> {
        if !self.workbook.sheet_names().iter().any(|name| name == sheet_name) {
            return Err(XlsxToDocxError::Config(format!(
                "Sheet '{}' not found",
                sheet_name
            )));
        }

        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| XlsxToDocxError::Parse(e.into()))?;

        let table = build_table(sheet_name, &range)?;
        debug!(sheet = sheet_name, records = table.len(), "sheet parsed");
        Ok(table)
    }
}

/// セル範囲から`Table`を構築する
fn build_table(sheet_name: &str, range: &Range<Data>) -> Result<Table, XlsxToDocxError> {
    let (last_row, last_col) = match range.end() {
        Some(end) if !range.is_empty() => end,
        _ => {
            return Err(XlsxToDocxError::MalformedSheet {
                sheet: sheet_name.to_string(),
                message: "sheet is empty".to_string(),
            })
        }
    };

    if last_col < LAST_FIELD_COL {
        return Err(XlsxToDocxError::MalformedSheet {
            sheet: sheet_name.to_string(),
            message: format!(
                "expected columns B..F, but the populated area ends at column {}",
                column_letter(last_col)
            ),
        });
    }

    // calamineの座標は0始まり、行番号は1始まり
    let max_row = last_row + 1;

    let mut table = Table::new();
    for row in (HEADER_ROW + 1)..=max_row {
        let fields = [0u32, 1, 2, 3, 4].map(|offset| {
            range
                .get_value((row - 1, FIRST_FIELD_COL + offset))
                .map(to_cell_value)
                .unwrap_or(CellValue::Empty)
        });
        table.insert(Record::new(row, fields));
    }

    Ok(table)
}

/// calamineのセル値を`CellValue`に変換
fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
        // ISO形式の日付・期間は文字列として扱う
        other => CellValue::String(other.to_string()),
    }
}

/// 列インデックスを列名に変換（0 -> "A"）
fn column_letter(mut col: u32) -> String {
    let mut result = String::new();
    loop {
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result
}
