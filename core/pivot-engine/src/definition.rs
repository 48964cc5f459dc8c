//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The validated configuration.
//!
//! This module contains the types needed to DESCRIBE a matrix pivot.
//! These structures are:
//! - Serializable (so the host can hand them over as JSON)
//! - Immutable snapshots of user intent once passed to the engine

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions for the value field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregationType {
    Count,
    Sum,
    Average,
    Min,
    Max,
}

impl Default for AggregationType {
    fn default() -> Self {
        AggregationType::Count
    }
}

impl AggregationType {
    /// Parses an aggregation name case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "count" => Some(AggregationType::Count),
            "sum" => Some(AggregationType::Sum),
            "average" | "avg" | "mean" => Some(AggregationType::Average),
            "min" => Some(AggregationType::Min),
            "max" => Some(AggregationType::Max),
            _ => None,
        }
    }

    /// Whether an axis (or cell) with no contributing values still has a value.
    /// COUNT and SUM are defined over the empty set; the others are not.
    pub fn defined_on_empty(&self) -> bool {
        matches!(self, AggregationType::Count | AggregationType::Sum)
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregationType::Count => "COUNT",
            AggregationType::Sum => "SUM",
            AggregationType::Average => "AVERAGE",
            AggregationType::Min => "MIN",
            AggregationType::Max => "MAX",
        };
        f.write_str(name)
    }
}

/// Sort order for axis labels and group labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    Ascending,
    Descending,
    /// Order of first appearance in the record set.
    DataSourceOrder,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Ascending
    }
}

// ============================================================================
// MAIN CONFIG STRUCT
// ============================================================================

/// The complete configuration of a matrix pivot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotConfig {
    /// Field whose values become row labels.
    pub row_field: String,

    /// Field whose values become column labels.
    pub column_field: String,

    /// Field aggregated into each cell.
    pub value_field: String,

    #[serde(rename = "aggregationType")]
    pub aggregation: AggregationType,

    #[serde(default = "default_true")]
    pub show_row_totals: bool,

    #[serde(default = "default_true")]
    pub show_column_totals: bool,

    /// Optional field used to cluster rows into collapsible groups.
    #[serde(default)]
    pub row_group_field: Option<String>,

    #[serde(default)]
    pub sort_order: SortOrder,
}

fn default_true() -> bool {
    true
}

impl PivotConfig {
    /// Creates a config with totals shown, no grouping and ascending order.
    pub fn new(
        row_field: impl Into<String>,
        column_field: impl Into<String>,
        value_field: impl Into<String>,
        aggregation: AggregationType,
    ) -> Self {
        PivotConfig {
            row_field: row_field.into(),
            column_field: column_field.into(),
            value_field: value_field.into(),
            aggregation,
            show_row_totals: true,
            show_column_totals: true,
            row_group_field: None,
            sort_order: SortOrder::Ascending,
        }
    }

    pub fn with_row_group_field(mut self, field: impl Into<String>) -> Self {
        self.row_group_field = Some(field.into());
        self
    }

    pub fn with_totals(mut self, show_row_totals: bool, show_column_totals: bool) -> Self {
        self.show_row_totals = show_row_totals;
        self.show_column_totals = show_column_totals;
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Whether any totals (and therefore the grand total) are requested.
    pub fn shows_totals(&self) -> bool {
        self.show_row_totals || self.show_column_totals
    }
}

// ============================================================================
// VALIDATION PROFILE
// ============================================================================

/// Deployment-level policy consulted by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationProfile {
    /// When true, reference-typed row/column/group fields are resolved to
    /// their display text. When false they are rejected.
    pub allow_reference_grouping: bool,
}

impl Default for ValidationProfile {
    fn default() -> Self {
        ValidationProfile {
            allow_reference_grouping: true,
        }
    }
}

impl ValidationProfile {
    pub fn strict() -> Self {
        ValidationProfile {
            allow_reference_grouping: false,
        }
    }
}
