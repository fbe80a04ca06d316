//! Sorter Module
//!
//! `Table`のレコードを指定フィールドで並べ替え、対象フィールドの値を取り出す。

use std::cmp::Ordering;
use tracing::debug;

use crate::api::Field;
use crate::error::XlsxToDocxError;
use crate::types::{CellValue, Record, Table};

/// 指定フィールドの昇順でレコードを並べ替える
///
/// 数値は数値順、文字列はコードポイント順で比較します。
/// 安定ソートのため、値が等しいレコードは元の行順を保ちます。
///
/// # エラー
///
/// * `HeterogeneousField` - 列に種類の異なる値（数値と文字列、値と空セルなど）が
///   混在している場合。暗黙の型変換は行いません。
pub fn sort_by_field(table: &Table, field: Field) -> Result<Vec<&Record>, XlsxToDocxError> {
    ensure_homogeneous(table, field)?;

    let mut sorted: Vec<&Record> = table.iter().collect();
    // 同種の値同士の比較は必ずSomeになる
    sorted.sort_by(|a, b| {
        a.get(field)
            .compare(b.get(field))
            .unwrap_or(Ordering::Equal)
    });

    debug!(%field, records = sorted.len(), "records sorted");
    Ok(sorted)
}

/// 並べ替えたレコードから対象フィールドの値を取り出す
///
/// 並べ替え済みの列を先頭から順に走査し、各レコードの`target`を射影します。
/// 5つのフィールドがすべて等しいレコードが複数あっても、それぞれ1回ずつ出力されます。
///
/// 並べ替えフィールドを指定しない場合は`Field::default()`（`LocaleEn`）を渡します。
pub fn get_field(
    table: &Table,
    target: Field,
    sorting: Field,
) -> Result<Vec<CellValue>, XlsxToDocxError> {
    let sorted = sort_by_field(table, sorting)?;
    Ok(sorted
        .into_iter()
        .map(|record| record.get(target).clone())
        .collect())
}

/// 列内の値がすべて同じ種類かを検証する
fn ensure_homogeneous(table: &Table, field: Field) -> Result<(), XlsxToDocxError> {
    let mut records = table.iter();
    let Some(first) = records.next() else {
        return Ok(());
    };

    let expected = first.get(field).kind();
    for record in records {
        let found = record.get(field).kind();
        if found != expected {
            return Err(XlsxToDocxError::HeterogeneousField {
                field,
                row: record.row(),
                expected,
                found,
            });
        }
    }

    Ok(())
}
