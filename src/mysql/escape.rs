use std::fmt::Write;

use crate::types::RowValue;

/// Backtick-quote an identifier. Dots split qualified names (`db.table` becomes
/// `` `db`.`table` ``); embedded backticks are doubled.
#[must_use]
pub fn escape_identifier(name: &str) -> String {
    name.split('.')
        .map(|part| format!("`{}`", part.replace('`', "``")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Render a value as a MySQL literal.
#[must_use]
pub fn escape_literal(value: &RowValue) -> String {
    match value {
        RowValue::Null => "NULL".to_string(),
        RowValue::Int(v) => v.to_string(),
        RowValue::UInt(v) => v.to_string(),
        RowValue::Float(v) if v.is_finite() => v.to_string(),
        RowValue::Float(_) => "NULL".to_string(),
        RowValue::Bool(v) => v.to_string(),
        RowValue::Text(s) => quote_string(s),
        RowValue::Timestamp(ts) => quote_string(&ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string()),
        RowValue::JSON(json) => quote_string(&json.to_string()),
        RowValue::Blob(bytes) => {
            let mut out = String::with_capacity(bytes.len() * 2 + 3);
            out.push_str("X'");
            for b in bytes {
                let _ = write!(out, "{b:02x}");
            }
            out.push('\'');
            out
        }
    }
}

fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1a}' => out.push_str("\\Z"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
