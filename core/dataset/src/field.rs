//! FILENAME: core/dataset/src/field.rs
//! PURPOSE: Field descriptors and their semantic data type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage flavour of a numeric field. The pivot engine treats all of them alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericKind {
    WholeNumber,
    Decimal,
    Currency,
    Float,
}

/// Semantic data type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    /// Enumerated single-select.
    Choice,
    /// Multi-select choice set.
    MultiChoice,
    /// Two-state boolean.
    TwoState,
    Numeric(NumericKind),
    Temporal,
    /// Linked-entity reference.
    Reference,
}

impl FieldType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Numeric(_))
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Temporal)
    }

    /// Whether axis labels for this type come from the formatted text
    /// rather than the raw value.
    pub fn uses_display_text(&self) -> bool {
        matches!(
            self,
            FieldType::Choice | FieldType::MultiChoice | FieldType::TwoState
        )
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, FieldType::Reference)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Choice => "choice",
            FieldType::MultiChoice => "multi-choice",
            FieldType::TwoState => "two-state",
            FieldType::Numeric(NumericKind::WholeNumber) => "whole number",
            FieldType::Numeric(NumericKind::Decimal) => "decimal",
            FieldType::Numeric(NumericKind::Currency) => "currency",
            FieldType::Numeric(NumericKind::Float) => "floating point",
            FieldType::Temporal => "date",
            FieldType::Reference => "reference",
        };
        f.write_str(name)
    }
}

/// Describes one column of the source data set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        FieldDescriptor {
            name: name.into(),
            field_type,
        }
    }
}
