//! FILENAME: core/pivot-engine/src/grouping.rs
//! Row Grouping - clusters row keys into named, collapsible groups.
//!
//! Each group owns the union of its member rows' accumulators, reduced with
//! the same policy as ordinary cells. Expand/collapse state lives outside the
//! engine in `CollapsedGroups`, which the host persists between loads.

use crate::cache::{AxisCache, AxisId, CellAccumulator, CellMatrix};
use crate::definition::{AggregationType, SortOrder};
use crate::error::Result;
use crate::sort::sort_labels;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// DURABLE COLLAPSE STATE
// ============================================================================

/// The set of collapsed group labels. Owned by the caller; the engine only
/// reads set membership from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollapsedGroups {
    labels: BTreeSet<String>,
}

impl CollapsedGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Flips a group's state and returns true when the group is now expanded.
    pub fn toggle(&mut self, label: &str) -> bool {
        if self.labels.remove(label) {
            true
        } else {
            self.labels.insert(label.to_string());
            false
        }
    }

    pub fn collapse(&mut self, label: impl Into<String>) {
        self.labels.insert(label.into());
    }

    pub fn expand(&mut self, label: &str) {
        self.labels.remove(label);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Encodes the state as a JSON list of labels for the host's persistence.
    pub fn to_state_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restores a state previously produced by `to_state_string`.
    /// An empty string restores an empty set.
    pub fn from_state_string(state: &str) -> Result<Self> {
        if state.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(state)?)
    }
}

impl<S: Into<String>> FromIterator<S> for CollapsedGroups {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        CollapsedGroups {
            labels: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// GROUP OUTPUT
// ============================================================================

/// A named cluster of rows sharing one value of the grouping field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotGroup {
    pub label: String,

    /// Member row keys, in row axis order.
    pub row_keys: Vec<String>,

    /// Group aggregate per column key. Absent means no contributing values.
    pub cells: FxHashMap<String, f64>,

    /// Aggregate across every member row and column.
    pub total: Option<f64>,

    pub collapsed: bool,
}

impl PivotGroup {
    pub fn cell(&self, column_key: &str) -> Option<f64> {
        self.cells.get(column_key).copied()
    }
}

/// Inputs of the grouping pass. `row_order` is the already-sorted row axis.
pub struct GroupingInput<'a> {
    pub rows: &'a AxisCache,
    pub row_order: &'a [AxisId],
    pub columns: &'a AxisCache,
    pub matrix: &'a CellMatrix,
    /// Group label of each row.
    pub assignments: &'a FxHashMap<AxisId, String>,
    pub aggregation: AggregationType,
    pub sort_order: SortOrder,
}

#[derive(Default)]
struct GroupBucket {
    members: Vec<AxisId>,
    cells: FxHashMap<AxisId, CellAccumulator>,
    total: CellAccumulator,
}

/// Buckets rows into groups and aggregates each group from the union of its
/// members' accumulators.
pub fn apply_grouping(input: &GroupingInput<'_>, collapsed: &CollapsedGroups) -> Vec<PivotGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: FxHashMap<String, GroupBucket> = FxHashMap::default();

    for &row in input.row_order {
        let label = input
            .assignments
            .get(&row)
            .cloned()
            .unwrap_or_else(|| crate::engine::BLANK_LABEL.to_string());

        let bucket = buckets.entry(label.clone()).or_insert_with(|| {
            order.push(label);
            GroupBucket::default()
        });
        bucket.members.push(row);
        for (column, acc) in input.matrix.row_cells(row) {
            bucket.cells.entry(column).or_default().merge(acc);
            bucket.total.merge(acc);
        }
    }

    sort_labels(&mut order, input.sort_order);

    order
        .into_iter()
        .filter_map(|label| {
            let bucket = buckets.remove(&label)?;
            let cells = bucket
                .cells
                .iter()
                .filter_map(|(&column, acc)| {
                    acc.reduce(input.aggregation)
                        .map(|v| (input.columns.label(column).to_string(), v))
                })
                .collect();
            Some(PivotGroup {
                collapsed: collapsed.is_collapsed(&label),
                row_keys: bucket
                    .members
                    .iter()
                    .map(|&row| input.rows.label(row).to_string())
                    .collect(),
                cells,
                total: bucket.total.reduce_total(input.aggregation),
                label,
            })
        })
        .collect()
}
