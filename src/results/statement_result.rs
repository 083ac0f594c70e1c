use std::collections::HashMap;
use std::sync::Arc;

use super::record::{Record, index_columns};
use crate::types::RowValue;

/// Raw outcome of one statement, as reported by the backend.
///
/// Reads fill `rows`; mutations fill `affected_rows` and, for inserts, `insert_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    /// Rows returned by a read (empty for mutations)
    pub rows: Vec<Record>,
    /// Rows changed by a mutation
    pub affected_rows: u64,
    /// Identifier assigned by the backend to an inserted row
    pub insert_id: Option<u64>,
}

impl StatementResult {
    /// A read result made of already-built records.
    #[must_use]
    pub fn from_rows(rows: Vec<Record>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// A mutation result carrying the backend's metadata.
    #[must_use]
    pub fn mutation(affected_rows: u64, insert_id: Option<u64>) -> Self {
        Self {
            rows: Vec::new(),
            affected_rows,
            insert_id,
        }
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }
}

/// Accumulates rows that share one set of column names.
#[derive(Debug)]
pub struct RowsBuilder {
    column_names: Arc<Vec<String>>,
    column_index_cache: Arc<HashMap<String, usize>>,
    rows: Vec<Record>,
}

impl RowsBuilder {
    #[must_use]
    pub fn new(column_names: Vec<String>, capacity: usize) -> Self {
        let column_index_cache = Arc::new(index_columns(&column_names));
        Self {
            column_names: Arc::new(column_names),
            column_index_cache,
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, values: Vec<RowValue>) {
        self.rows.push(Record::with_cache(
            Arc::clone(&self.column_names),
            values,
            Arc::clone(&self.column_index_cache),
        ));
    }

    #[must_use]
    pub fn finish(self) -> StatementResult {
        StatementResult::from_rows(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_share_column_names() {
        let mut builder = RowsBuilder::new(vec!["id".into(), "title".into()], 2);
        builder.push(vec![RowValue::Int(1), RowValue::from("a")]);
        builder.push(vec![RowValue::Int(2), RowValue::from("b")]);
        let result = builder.finish();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.affected_rows, 0);
        assert_eq!(result.rows[1].get("title"), Some(&RowValue::from("b")));
        assert_eq!(result.rows[0].column_names(), result.rows[1].column_names());
    }
}
