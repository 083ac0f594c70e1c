use std::fmt;

use chrono::NaiveDateTime;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// Values that can be stored in a record field or used as a filter / set value.
///
/// The same enum is used for every backend so query building never branches on driver types:
/// ```rust
/// use datastore_mysql::prelude::*;
///
/// let values = vec![
///     RowValue::Int(42),
///     RowValue::Text("new title".into()),
///     RowValue::Bool(true),
/// ];
/// # let _ = values;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowValue {
    /// Signed integer value (64-bit)
    Int(i64),
    /// Unsigned integer value (64-bit)
    UInt(u64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RowValue::Int(value) => Some(*value),
            RowValue::UInt(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RowValue::Bool(value) => Some(*value),
            _ => match self.as_int() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValue::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            // %.f also accepts a missing fraction
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValue::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

/// Plain, unquoted rendering. Escaping is the connection's job, never this impl's.
impl fmt::Display for RowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowValue::Int(v) => write!(f, "{v}"),
            RowValue::UInt(v) => write!(f, "{v}"),
            RowValue::Float(v) => write!(f, "{v}"),
            RowValue::Text(v) => f.write_str(v),
            RowValue::Bool(v) => write!(f, "{v}"),
            RowValue::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f")),
            RowValue::Null => f.write_str("NULL"),
            RowValue::JSON(v) => write!(f, "{v}"),
            RowValue::Blob(bytes) => {
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<i64> for RowValue {
    fn from(value: i64) -> Self {
        RowValue::Int(value)
    }
}

impl From<i32> for RowValue {
    fn from(value: i32) -> Self {
        RowValue::Int(i64::from(value))
    }
}

impl From<u64> for RowValue {
    fn from(value: u64) -> Self {
        RowValue::UInt(value)
    }
}

impl From<f64> for RowValue {
    fn from(value: f64) -> Self {
        RowValue::Float(value)
    }
}

impl From<bool> for RowValue {
    fn from(value: bool) -> Self {
        RowValue::Bool(value)
    }
}

impl From<&str> for RowValue {
    fn from(value: &str) -> Self {
        RowValue::Text(value.to_string())
    }
}

impl From<String> for RowValue {
    fn from(value: String) -> Self {
        RowValue::Text(value)
    }
}

impl From<NaiveDateTime> for RowValue {
    fn from(value: NaiveDateTime) -> Self {
        RowValue::Timestamp(value)
    }
}

impl From<Vec<u8>> for RowValue {
    fn from(value: Vec<u8>) -> Self {
        RowValue::Blob(value)
    }
}

impl<T: Into<RowValue>> From<Option<T>> for RowValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValue::Null, Into::into)
    }
}

/// Scalars map onto their natural variant; arrays and objects stay JSON.
impl From<JsonValue> for RowValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => RowValue::Null,
            JsonValue::Bool(b) => RowValue::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RowValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    RowValue::UInt(u)
                } else {
                    RowValue::Float(n.as_f64().unwrap_or_default())
                }
            }
            JsonValue::String(s) => RowValue::Text(s),
            other @ (JsonValue::Array(_) | JsonValue::Object(_)) => RowValue::JSON(other),
        }
    }
}

/// Ordered field name → value mapping.
///
/// Used for filters (equality conjunction), update sets and insert sets. Iteration follows
/// insertion order; re-inserting an existing field replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, RowValue)>,
}

impl FieldMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<RowValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<RowValue>) -> Option<RowValue> {
        let field = field.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(name, _)| *name == field) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((field, value));
        None
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&RowValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<RowValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (field, value) in iter {
            map.insert(field, value);
        }
        map
    }
}

impl From<JsonMap<String, JsonValue>> for FieldMap {
    fn from(object: JsonMap<String, JsonValue>) -> Self {
        object.into_iter().collect()
    }
}

struct FieldMapVisitor;

impl<'de> Visitor<'de> for FieldMapVisitor {
    type Value = FieldMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldMap, A::Error> {
        let mut map = FieldMap::new();
        while let Some((field, value)) = access.next_entry::<String, JsonValue>()? {
            map.insert(field, value);
        }
        Ok(map)
    }
}

// Entries are read in document order, independent of serde_json's map ordering.
impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FieldMapVisitor)
    }
}

/// Options accepted by `find`.
///
/// Deserializes from the JSON shape the façade passes around:
/// ```rust
/// use datastore_mysql::prelude::*;
///
/// let opts: FindOptions =
///     serde_json::from_str(r#"{"fields": ["title"], "offset": 10, "limit": 42}"#).unwrap();
/// assert_eq!(opts.limit, Some(42));
/// assert!(opts.filter.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FindOptions {
    /// Equality filter; absent or empty means no restriction.
    pub filter: Option<FieldMap>,
    /// Fields to project; empty means `*`.
    pub fields: Vec<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl FindOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: FieldMap) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// How requested field names are rendered in the SELECT projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// Join names with commas exactly as given (no identifier escaping).
    #[default]
    Raw,
    /// Pass every name through the connection's identifier escaping.
    Escaped,
    /// Join as given, but reject names that are not plain (optionally qualified) identifiers.
    Validated,
}
