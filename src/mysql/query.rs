use chrono::{NaiveDate, NaiveDateTime};
use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::{Column, Row, Value};

use crate::results::{RowsBuilder, StatementResult};
use crate::types::RowValue;

// character set number MySQL reports for binary strings
const BINARY_CHARSET: u16 = 63;

/// Extract a `RowValue` from a driver value, using the column metadata to type the text
/// protocol's byte strings.
#[must_use]
pub fn mysql_extract_value(column: &Column, value: &Value) -> RowValue {
    match value {
        Value::NULL => RowValue::Null,
        Value::Int(i) => RowValue::Int(*i),
        Value::UInt(u) => RowValue::UInt(*u),
        Value::Float(f) => RowValue::Float(f64::from(*f)),
        Value::Double(f) => RowValue::Float(*f),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            NaiveDate::from_ymd_opt(i32::from(*year), u32::from(*month), u32::from(*day))
                .and_then(|date| {
                    date.and_hms_micro_opt(
                        u32::from(*hour),
                        u32::from(*minute),
                        u32::from(*second),
                        *micros,
                    )
                })
                .map_or(RowValue::Null, RowValue::Timestamp)
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if *negative { "-" } else { "" };
            let hours = u64::from(*days) * 24 + u64::from(*hours);
            RowValue::Text(format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{micros:06}"))
        }
        Value::Bytes(bytes) => typed_bytes(column, bytes),
    }
}

fn typed_bytes(column: &Column, bytes: &[u8]) -> RowValue {
    let text = std::str::from_utf8(bytes);
    match (column.column_type(), text) {
        (
            ColumnType::MYSQL_TYPE_TINY
            | ColumnType::MYSQL_TYPE_SHORT
            | ColumnType::MYSQL_TYPE_INT24
            | ColumnType::MYSQL_TYPE_LONG
            | ColumnType::MYSQL_TYPE_LONGLONG
            | ColumnType::MYSQL_TYPE_YEAR,
            Ok(text),
        ) => {
            if column.flags().contains(ColumnFlags::UNSIGNED_FLAG) {
                text.parse().map_or_else(|_| RowValue::Text(text.to_string()), RowValue::UInt)
            } else {
                text.parse().map_or_else(|_| RowValue::Text(text.to_string()), RowValue::Int)
            }
        }
        (ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE, Ok(text)) => text
            .parse()
            .map_or_else(|_| RowValue::Text(text.to_string()), RowValue::Float),
        (
            ColumnType::MYSQL_TYPE_DATETIME
            | ColumnType::MYSQL_TYPE_DATETIME2
            | ColumnType::MYSQL_TYPE_TIMESTAMP
            | ColumnType::MYSQL_TYPE_TIMESTAMP2
            | ColumnType::MYSQL_TYPE_DATE,
            Ok(text),
        ) => parse_datetime(text).map_or_else(|| RowValue::Text(text.to_string()), RowValue::Timestamp),
        (ColumnType::MYSQL_TYPE_JSON, Ok(text)) => serde_json::from_str(text)
            .map_or_else(|_| RowValue::Text(text.to_string()), RowValue::JSON),
        // exact numerics and durations stay textual, like the text protocol sends them
        (
            ColumnType::MYSQL_TYPE_DECIMAL
            | ColumnType::MYSQL_TYPE_NEWDECIMAL
            | ColumnType::MYSQL_TYPE_TIME
            | ColumnType::MYSQL_TYPE_TIME2,
            Ok(text),
        ) => RowValue::Text(text.to_string()),
        (
            ColumnType::MYSQL_TYPE_VARCHAR
            | ColumnType::MYSQL_TYPE_VAR_STRING
            | ColumnType::MYSQL_TYPE_STRING
            | ColumnType::MYSQL_TYPE_TINY_BLOB
            | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
            | ColumnType::MYSQL_TYPE_LONG_BLOB
            | ColumnType::MYSQL_TYPE_BLOB,
            _,
        ) if column.character_set() == BINARY_CHARSET => RowValue::Blob(bytes.to_vec()),
        (_, Ok(text)) => RowValue::Text(text.to_string()),
        (_, Err(_)) => RowValue::Blob(bytes.to_vec()),
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Build a `StatementResult` from the rows of one statement plus the connection's OK-packet
/// metadata.
#[must_use]
pub fn build_statement_result(
    rows: Vec<Row>,
    affected_rows: u64,
    insert_id: Option<u64>,
) -> StatementResult {
    let Some(first) = rows.first() else {
        return StatementResult::mutation(affected_rows, insert_id);
    };
    let columns = first.columns();
    let column_names = columns
        .iter()
        .map(|col| col.name_str().into_owned())
        .collect();

    let mut builder = RowsBuilder::new(column_names, rows.len());
    for row in &rows {
        let values = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                row.as_ref(idx)
                    .map_or(RowValue::Null, |value| mysql_extract_value(column, value))
            })
            .collect();
        builder.push(values);
    }

    let mut result = builder.finish();
    result.affected_rows = affected_rows;
    result.insert_id = insert_id;
    result
}
