use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::types::RowValue;

/// A single row returned by a read.
///
/// The shape is whatever the backend answered with; column names are shared by every
/// record of the same result.
#[derive(Debug, Clone)]
pub struct Record {
    column_names: Arc<Vec<String>>,
    values: Vec<RowValue>,
    // name -> index, shared with the sibling records of the same result
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl Record {
    /// Create a record from column names and the matching values.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValue>) -> Self {
        let cache = Arc::new(index_columns(&column_names));
        Self::with_cache(column_names, values, cache)
    }

    pub(crate) fn with_cache(
        column_names: Arc<Vec<String>>,
        values: Vec<RowValue>,
        column_index_cache: Arc<HashMap<String, usize>>,
    ) -> Self {
        Self {
            column_names,
            values,
            column_index_cache,
        }
    }

    /// Build a record from `(column, value)` pairs, keeping their order.
    ///
    /// ```rust
    /// use datastore_mysql::prelude::*;
    ///
    /// let record = Record::from_pairs([("field", RowValue::from("value"))]);
    /// assert_eq!(record.get("field").and_then(RowValue::as_text), Some("value"));
    /// ```
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, RowValue)>,
        K: Into<String>,
    {
        let (names, values): (Vec<String>, Vec<RowValue>) =
            pairs.into_iter().map(|(k, v)| (k.into(), v)).unzip();
        Self::new(Arc::new(names), values)
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn values(&self) -> &[RowValue] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of a column by name, if present.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index_cache.get(column_name).copied()
    }

    /// Value of a column by name.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValue> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValue> {
        self.values.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValue)> {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Render the record as a JSON object (column order preserved).
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let object: JsonMap<String, JsonValue> = self
            .iter()
            .map(|(name, value)| {
                let json = serde_json::to_value(value).unwrap_or(JsonValue::Null);
                (name.to_string(), json)
            })
            .collect();
        JsonValue::Object(object)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.column_names == other.column_names && self.values == other.values
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

pub(crate) fn index_columns(column_names: &[String]) -> HashMap<String, usize> {
    column_names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect()
}
