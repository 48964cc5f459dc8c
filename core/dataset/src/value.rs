//! FILENAME: core/dataset/src/value.rs
//! PURPOSE: Defines the raw typed value a record exposes for one field.
//! CONTEXT: `FieldValue` is what the upstream grid/query layer hands us. It is
//! deliberately close to the source data: no coercion happens here except the
//! string and timestamp projections the pivot engine needs.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// The raw value of a single field on a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Null / absent marker.
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDateTime),
    /// Identifier of a linked entity.
    Reference(String),
    /// Selected labels of a multi-select choice set.
    Choices(Vec<String>),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn reference(id: impl Into<String>) -> Self {
        FieldValue::Reference(id.into())
    }

    /// True for the null marker and for text or choice values with no content.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) | FieldValue::Reference(s) => s.is_empty(),
            FieldValue::Choices(items) => items.iter().all(|s| s.is_empty()),
            _ => false,
        }
    }

    /// Returns the string form of the value.
    /// Integral numbers are printed without a fractional part.
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            FieldValue::Text(s) | FieldValue::Reference(s) => s.clone(),
            FieldValue::Boolean(b) => {
                if *b { "TRUE" } else { "FALSE" }.to_string()
            }
            FieldValue::Date(dt) => {
                if dt.time().num_seconds_from_midnight() == 0 && dt.time().nanosecond() == 0 {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            FieldValue::Choices(items) => items
                .iter()
                .filter(|s| !s.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    /// Milliseconds since the Unix epoch for date values (interpreted as UTC).
    pub fn timestamp_millis(&self) -> Option<i64> {
        match self {
            FieldValue::Date(dt) => Some(dt.and_utc().timestamp_millis()),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Empty, Into::into)
    }
}
