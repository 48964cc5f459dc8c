//! FILENAME: core/pivot-engine/src/cache.rs
//! Pivot Cache - Per-call internal representation.
//!
//! Architecture:
//! - Each axis label is interned once and referenced by id
//! - Cells are stored sparsely in a two-level map (row id -> column id -> accumulator)
//! - Accumulators keep the raw contributing values so totals and groups can be
//!   re-aggregated from them instead of from already-reduced cell values
//!
//! Everything here is built fresh on every transform call and dropped afterwards.

use crate::definition::{AggregationType, SortOrder};
use crate::sort::compare_in_order;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ============================================================================
// AXIS INTERNING
// ============================================================================

/// A reference to an interned axis label.
pub type AxisId = u32;

/// Interns the labels of one axis in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct AxisCache {
    label_to_id: FxHashMap<String, AxisId>,
    labels: Vec<String>,
}

impl AxisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a label and returns its id. Existing labels keep their id.
    pub fn intern(&mut self, label: String) -> AxisId {
        if let Some(&id) = self.label_to_id.get(&label) {
            return id;
        }
        let id = self.labels.len() as AxisId;
        self.labels.push(label.clone());
        self.label_to_id.insert(label, id);
        id
    }

    pub fn id_of(&self, label: &str) -> Option<AxisId> {
        self.label_to_id.get(label).copied()
    }

    pub fn label(&self, id: AxisId) -> &str {
        &self.labels[id as usize]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All ids ordered by label according to `order`.
    pub fn ordered_ids(&self, order: SortOrder) -> Vec<AxisId> {
        let mut ids: Vec<AxisId> = (0..self.labels.len() as AxisId).collect();
        ids.sort_by(|&a, &b| compare_in_order(self.label(a), self.label(b), order));
        ids
    }
}

// ============================================================================
// CELL ACCUMULATOR
// ============================================================================

/// Collects the contributions routed to one cell.
///
/// `values` holds the non-null numeric values in scan order; `count` also
/// includes registered records whose value was null (COUNT needs them).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellAccumulator {
    pub values: SmallVec<[f64; 4]>,
    pub count: u64,
}

impl CellAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_value(&mut self, value: f64) {
        self.values.push(value);
        self.count += 1;
    }

    /// Registers a record that carried no numeric value.
    pub fn add_null(&mut self) {
        self.count += 1;
    }

    /// Appends another accumulator's contributions (union, not re-aggregation).
    pub fn merge(&mut self, other: &CellAccumulator) {
        self.values.extend_from_slice(&other.values);
        self.count += other.count;
    }

    pub fn non_null_count(&self) -> usize {
        self.values.len()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Reduces to a cell value. Only COUNT yields a value when no numeric
    /// values were collected; every other aggregation omits the cell.
    pub fn reduce(&self, aggregation: AggregationType) -> Option<f64> {
        match aggregation {
            AggregationType::Count => Some(self.count as f64),
            _ if self.values.is_empty() => None,
            AggregationType::Sum => Some(self.sum()),
            AggregationType::Average => Some(self.sum() / self.values.len() as f64),
            AggregationType::Min => self.values.iter().copied().reduce(f64::min),
            AggregationType::Max => self.values.iter().copied().reduce(f64::max),
        }
    }

    /// Reduces to a total. COUNT and SUM default to 0 over an empty set;
    /// AVERAGE, MIN and MAX stay absent.
    pub fn reduce_total(&self, aggregation: AggregationType) -> Option<f64> {
        match aggregation {
            AggregationType::Sum if self.values.is_empty() => Some(0.0),
            _ => self.reduce(aggregation),
        }
    }
}

// ============================================================================
// SPARSE CELL MATRIX
// ============================================================================

/// Sparse storage of cell accumulators keyed by (row id, column id).
#[derive(Debug, Clone, Default)]
pub struct CellMatrix {
    rows: FxHashMap<AxisId, FxHashMap<AxisId, CellAccumulator>>,
    cell_count: usize,
}

/// Accumulators merged along each axis plus the grand accumulator.
#[derive(Debug, Clone, Default)]
pub struct AxisTotals {
    pub rows: FxHashMap<AxisId, CellAccumulator>,
    pub columns: FxHashMap<AxisId, CellAccumulator>,
    pub grand: CellAccumulator,
}

impl CellMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the accumulator for a cell, creating it on first use.
    pub fn entry(&mut self, row: AxisId, column: AxisId) -> &mut CellAccumulator {
        let row_cells = self.rows.entry(row).or_default();
        if !row_cells.contains_key(&column) {
            self.cell_count += 1;
        }
        row_cells.entry(column).or_default()
    }

    pub fn get(&self, row: AxisId, column: AxisId) -> Option<&CellAccumulator> {
        self.rows.get(&row).and_then(|cells| cells.get(&column))
    }

    /// Iterates the populated cells of one row.
    pub fn row_cells(&self, row: AxisId) -> impl Iterator<Item = (AxisId, &CellAccumulator)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cells| cells.iter().map(|(&column, acc)| (column, acc)))
    }

    /// Iterates every populated cell.
    pub fn iter(&self) -> impl Iterator<Item = (AxisId, AxisId, &CellAccumulator)> {
        self.rows.iter().flat_map(|(&row, cells)| {
            cells.iter().map(move |(&column, acc)| (row, column, acc))
        })
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Merges every cell along both axes in a single pass.
    pub fn axis_totals(&self) -> AxisTotals {
        let mut totals = AxisTotals::default();
        for (row, column, acc) in self.iter() {
            totals.rows.entry(row).or_default().merge(acc);
            totals.columns.entry(column).or_default().merge(acc);
            totals.grand.merge(acc);
        }
        totals
    }
}
