//! Value types shared by the schema, the codec and the storage bindings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A typed attribute value.
///
/// Every value carries its own tag when encoded, so heterogeneous and nested
/// lists survive a round trip through the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Plain-text rendering fed to term extraction.
    ///
    /// `None` for null values and for lists without any renderable item.
    pub fn to_text(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            FieldValue::Timestamp(t) => Some(t.to_rfc3339()),
            FieldValue::List(items) => {
                let parts: Vec<String> = items.iter().filter_map(FieldValue::to_text).collect();
                if parts.is_empty() { None } else { Some(parts.join(" ")) }
            }
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self { FieldValue::Boolean(v) }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self { FieldValue::Integer(v) }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self { FieldValue::Integer(i64::from(v)) }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self { FieldValue::Float(v) }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self { FieldValue::Text(v.to_string()) }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self { FieldValue::Text(v) }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self { FieldValue::Date(v) }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self { FieldValue::Timestamp(v) }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(v: Vec<FieldValue>) -> Self { FieldValue::List(v) }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

/// A persisted document as handed back by the storage engine.
///
/// - `uid`: document data, `"<class>-<primary key>"`
/// - `values`: slot values; slot 0 is the raw class name, slots 1..N hold
///   encoded attributes in schema declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub uid: String,
    pub values: Vec<String>,
}

impl StoredDocument {
    pub fn new(uid: impl Into<String>, values: Vec<String>) -> Self {
        Self { uid: uid.into(), values }
    }

    pub fn value(&self, slot: usize) -> Option<&str> {
        self.values.get(slot).map(String::as_str)
    }
}
