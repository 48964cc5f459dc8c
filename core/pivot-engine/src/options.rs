//! FILENAME: core/pivot-engine/src/options.rs
//! Flat option set handed over by the host, and its conversion into a
//! `PivotConfig`.

use crate::definition::{AggregationType, PivotConfig, SortOrder};
use crate::error::{PivotError, Result};
use serde::{Deserialize, Serialize};

/// Named options as the host's configuration surface delivers them.
/// Every option is optional on the wire; `into_config` enforces the required ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotOptions {
    pub row_field: Option<String>,
    pub column_field: Option<String>,
    pub value_field: Option<String>,
    /// "count", "sum", "average", "min", "max"
    pub aggregation_type: Option<String>,
    pub show_row_totals: Option<bool>,
    pub show_column_totals: Option<bool>,
    pub row_group_field: Option<String>,
    /// "asc", "desc", "source"
    pub sort_order: Option<String>,
}

impl PivotOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PivotError::InvalidOption {
            option: "options".to_string(),
            value: e.to_string(),
        })
    }

    /// Converts the options into a config, applying defaults.
    pub fn into_config(self) -> Result<PivotConfig> {
        let row_field = required("rowField", self.row_field)?;
        let column_field = required("columnField", self.column_field)?;
        let value_field = required("valueField", self.value_field)?;

        let aggregation_name = required("aggregationType", self.aggregation_type)?;
        let aggregation = AggregationType::parse(&aggregation_name).ok_or_else(|| {
            PivotError::InvalidOption {
                option: "aggregationType".to_string(),
                value: aggregation_name.clone(),
            }
        })?;

        let sort_order = match self.sort_order {
            Some(ref sort) => parse_sort_order(sort)?,
            None => SortOrder::Ascending,
        };

        let row_group_field = self
            .row_group_field
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());

        Ok(PivotConfig {
            row_field,
            column_field,
            value_field,
            aggregation,
            show_row_totals: self.show_row_totals.unwrap_or(true),
            show_column_totals: self.show_column_totals.unwrap_or(true),
            row_group_field,
            sort_order,
        })
    }
}

fn required(option: &str, value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        other => Err(PivotError::InvalidOption {
            option: option.to_string(),
            value: other.unwrap_or_default(),
        }),
    }
}

fn parse_sort_order(sort: &str) -> Result<SortOrder> {
    match sort.trim().to_lowercase().as_str() {
        "" | "asc" | "ascending" => Ok(SortOrder::Ascending),
        "desc" | "descending" => Ok(SortOrder::Descending),
        "source" | "datasource" => Ok(SortOrder::DataSourceOrder),
        _ => Err(PivotError::InvalidOption {
            option: "sortOrder".to_string(),
            value: sort.to_string(),
        }),
    }
}
