//! FILENAME: core/pivot-engine/src/error.rs

use crate::definition::AggregationType;
use dataset::FieldType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PivotError {
    #[error("Field not found: '{field}'")]
    MissingField { field: String },

    #[error("Field '{field}' is a linked-entity reference and cannot be used for grouping")]
    UnsupportedGroupingField { field: String },

    #[error("{aggregation} cannot be applied to field '{field}' of type {field_type}")]
    IncompatibleAggregation {
        aggregation: AggregationType,
        field: String,
        field_type: FieldType,
    },

    #[error("The data set has no fields configured")]
    DatasetNotConfigured,

    #[error("Invalid value for option '{option}': '{value}'")]
    InvalidOption { option: String, value: String },

    #[error("Invalid collapsed-group state: {0}")]
    InvalidState(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PivotError>;
