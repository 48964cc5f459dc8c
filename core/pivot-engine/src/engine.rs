//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - The calculation core that turns records into a matrix.
//!
//! This module takes a `PivotConfig` and a `RecordSource` and produces a
//! `PivotResult`.
//!
//! Algorithm:
//! 1. Scan records once, deriving a row key and a column key per record
//! 2. Route each contributing record's value into its cell accumulator
//! 3. Reduce every populated cell with the aggregation policy
//! 4. Sort both axes with the smart comparator
//! 5. Re-aggregate accumulators along each axis for totals
//! 6. Optionally cluster rows into groups (see `grouping`)

use crate::cache::{AxisCache, AxisId, CellAccumulator, CellMatrix};
use crate::definition::{AggregationType, PivotConfig, ValidationProfile};
use crate::error::{PivotError, Result};
use crate::grouping::{apply_grouping, CollapsedGroups, GroupingInput};
use crate::validate::validate_with_profile;
use crate::view::{DrillDownResult, PivotResult, PivotStats, ValueKind};
use dataset::{FieldDescriptor, FieldValue, Record, RecordSource};
use rustc_hash::{FxHashMap, FxHashSet};

const LOG_TARGET: &str = "pivot";

/// Axis label used for null, absent or empty field values.
pub const BLANK_LABEL: &str = "(Blank)";

// ============================================================================
// KEY AND VALUE DERIVATION
// ============================================================================

/// Derives the axis label of a record for one field.
///
/// Choice, multi-choice and two-state fields use the formatted text; an empty
/// formatted text is blank, and the raw value is used only when the source
/// supplies no formatting. Reference fields use the formatted display text,
/// falling back to the raw identifier. Everything else uses the raw value.
pub fn derive_key<R: Record>(record: &R, field: &FieldDescriptor) -> String {
    let raw = match record.raw(&field.name) {
        Some(value) if !value.is_empty() => value,
        _ => return BLANK_LABEL.to_string(),
    };

    let label = if field.field_type.uses_display_text() {
        // Empty formatted text stays empty and becomes the blank label.
        match record.formatted(&field.name) {
            Some(text) => text,
            None => raw.display_value(),
        }
    } else if field.field_type.is_reference() {
        match record.formatted(&field.name) {
            Some(text) if !text.is_empty() => text,
            _ => raw.display_value(),
        }
    } else {
        raw.display_value()
    };

    if label.is_empty() {
        BLANK_LABEL.to_string()
    } else {
        label
    }
}

/// Coerces a raw value to the number accumulated for it.
/// Dates become epoch milliseconds. `None` means the value counts as null.
pub fn numeric_value(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) if n.is_finite() => Some(*n),
        FieldValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        FieldValue::Date(_) => value.timestamp_millis().map(|ms| ms as f64),
        FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

// ============================================================================
// PIVOT CALCULATOR
// ============================================================================

/// The main calculation engine. Holds only per-call state.
pub struct PivotCalculator<'a, S: RecordSource> {
    source: &'a S,
    config: &'a PivotConfig,

    row_field: &'a FieldDescriptor,
    column_field: &'a FieldDescriptor,
    value_field: &'a FieldDescriptor,
    group_field: Option<&'a FieldDescriptor>,

    rows: AxisCache,
    columns: AxisCache,
    matrix: CellMatrix,

    /// Group label of each row; the first value seen wins.
    row_groups: FxHashMap<AxisId, String>,

    /// Rows whose records disagreed on the group value.
    conflicting_rows: FxHashSet<AxisId>,

    stats: PivotStats,
}

impl<'a, S: RecordSource> PivotCalculator<'a, S> {
    /// Creates a calculator. Fails when the source has no fields at all or a
    /// configured field does not exist.
    pub fn new(source: &'a S, config: &'a PivotConfig) -> Result<Self> {
        if source.fields().is_empty() {
            return Err(PivotError::DatasetNotConfigured);
        }

        let lookup = |name: &str| {
            source.field(name).ok_or_else(|| PivotError::MissingField {
                field: name.to_string(),
            })
        };
        let row_field = lookup(&config.row_field)?;
        let column_field = lookup(&config.column_field)?;
        let value_field = lookup(&config.value_field)?;
        let group_field = match config.row_group_field {
            Some(ref name) => Some(lookup(name)?),
            None => None,
        };

        Ok(PivotCalculator {
            source,
            config,
            row_field,
            column_field,
            value_field,
            group_field,
            rows: AxisCache::new(),
            columns: AxisCache::new(),
            matrix: CellMatrix::new(),
            row_groups: FxHashMap::default(),
            conflicting_rows: FxHashSet::default(),
            stats: PivotStats::default(),
        })
    }

    fn value_kind(&self) -> ValueKind {
        match self.config.aggregation {
            AggregationType::Min | AggregationType::Max if self.value_field.field_type.is_temporal() => {
                ValueKind::Temporal
            }
            _ => ValueKind::Number,
        }
    }

    /// Executes the full calculation.
    pub fn calculate(mut self, collapsed: &CollapsedGroups) -> PivotResult {
        let records = self.source.records();
        log::debug!(
            target: LOG_TARGET,
            "transform rows={} cols={} value={} agg={} records={}",
            self.config.row_field,
            self.config.column_field,
            self.config.value_field,
            self.config.aggregation,
            records.len()
        );

        if records.is_empty() {
            let mut result = PivotResult::empty(
                self.config.aggregation,
                self.value_kind(),
                self.config.show_row_totals,
                self.config.show_column_totals,
            );
            if self.group_field.is_some() {
                result.groups = Some(Vec::new());
            }
            return result;
        }

        self.scan();
        let result = self.build_result(collapsed);

        log::debug!(
            target: LOG_TARGET,
            "transform done rows={} cols={} cells={} skipped={}",
            result.row_keys.len(),
            result.column_keys.len(),
            result.stats.cell_count,
            result.stats.skipped_records
        );
        result
    }

    /// Single pass over the records, filling the sparse cell matrix.
    fn scan(&mut self) {
        let aggregation = self.config.aggregation;
        let source = self.source;

        for record in source.records() {
            self.stats.total_records += 1;

            let value = record.raw(&self.value_field.name).and_then(numeric_value);
            if value.is_none() && aggregation != AggregationType::Count {
                self.stats.skipped_records += 1;
                continue;
            }

            let row = self.rows.intern(derive_key(record, self.row_field));
            let column = self.columns.intern(derive_key(record, self.column_field));

            let acc = self.matrix.entry(row, column);
            match value {
                Some(v) => acc.add_value(v),
                None => acc.add_null(),
            }
            self.stats.contributing_records += 1;

            if let Some(group_field) = self.group_field {
                let group = derive_key(record, group_field);
                match self.row_groups.get(&row) {
                    Some(existing) if *existing != group => {
                        self.conflicting_rows.insert(row);
                    }
                    Some(_) => {}
                    None => {
                        self.row_groups.insert(row, group);
                    }
                }
            }
        }

        if !self.conflicting_rows.is_empty() {
            log::warn!(
                target: LOG_TARGET,
                "{} row(s) have records with differing '{}' values; using the first value seen",
                self.conflicting_rows.len(),
                self.config.row_group_field.as_deref().unwrap_or_default()
            );
        }

        self.stats.cell_count = self.matrix.cell_count();
    }

    /// Reduces accumulators and assembles the result.
    fn build_result(&self, collapsed: &CollapsedGroups) -> PivotResult {
        let aggregation = self.config.aggregation;
        let row_order = self.rows.ordered_ids(self.config.sort_order);
        let column_order = self.columns.ordered_ids(self.config.sort_order);

        let mut cells: FxHashMap<String, FxHashMap<String, f64>> = FxHashMap::default();
        for (row, column, acc) in self.matrix.iter() {
            if let Some(value) = acc.reduce(aggregation) {
                cells
                    .entry(self.rows.label(row).to_string())
                    .or_default()
                    .insert(self.columns.label(column).to_string(), value);
            }
        }

        let mut result = PivotResult::empty(
            aggregation,
            self.value_kind(),
            self.config.show_row_totals,
            self.config.show_column_totals,
        );
        result.row_keys = row_order.iter().map(|&id| self.rows.label(id).to_string()).collect();
        result.column_keys = column_order
            .iter()
            .map(|&id| self.columns.label(id).to_string())
            .collect();
        result.cells = cells;
        result.stats = self.stats.clone();

        if self.config.shows_totals() {
            let totals = self.matrix.axis_totals();
            if self.config.show_row_totals {
                result.row_totals = Some(reduce_axis(&row_order, &self.rows, &totals.rows, aggregation));
            }
            if self.config.show_column_totals {
                result.column_totals = Some(reduce_axis(
                    &column_order,
                    &self.columns,
                    &totals.columns,
                    aggregation,
                ));
            }
            result.grand_total = totals.grand.reduce_total(aggregation);
        }

        if self.group_field.is_some() {
            let input = GroupingInput {
                rows: &self.rows,
                row_order: &row_order,
                columns: &self.columns,
                matrix: &self.matrix,
                assignments: &self.row_groups,
                aggregation,
                sort_order: self.config.sort_order,
            };
            result.groups = Some(apply_grouping(&input, collapsed));
        }

        result
    }

    /// Whether a record contributes to the matrix under the configured aggregation.
    fn contributes(&self, record: &S::Record) -> bool {
        self.config.aggregation == AggregationType::Count
            || record
                .raw(&self.value_field.name)
                .and_then(numeric_value)
                .is_some()
    }
}

/// Reduces merged axis accumulators into label-keyed totals.
fn reduce_axis(
    order: &[AxisId],
    axis: &AxisCache,
    accumulators: &FxHashMap<AxisId, CellAccumulator>,
    aggregation: AggregationType,
) -> FxHashMap<String, f64> {
    order
        .iter()
        .filter_map(|id| {
            let total = accumulators.get(id)?.reduce_total(aggregation)?;
            Some((axis.label(*id).to_string(), total))
        })
        .collect()
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Transforms records into a pivot result. The config is assumed to have
/// passed validation already; grouping is applied when configured, with every
/// group expanded.
pub fn transform<S: RecordSource>(source: &S, config: &PivotConfig) -> Result<PivotResult> {
    let calculator = PivotCalculator::new(source, config)?;
    Ok(calculator.calculate(&CollapsedGroups::default()))
}

/// Validates, transforms and groups in one call.
/// This is the main entry point for hosts.
pub fn calculate_pivot<S: RecordSource>(
    source: &S,
    config: &PivotConfig,
    collapsed: &CollapsedGroups,
) -> Result<PivotResult> {
    calculate_pivot_with_profile(source, config, &ValidationProfile::default(), collapsed)
}

/// `calculate_pivot` under an explicit deployment profile.
pub fn calculate_pivot_with_profile<S: RecordSource>(
    source: &S,
    config: &PivotConfig,
    profile: &ValidationProfile,
    collapsed: &CollapsedGroups,
) -> Result<PivotResult> {
    if source.fields().is_empty() {
        return Err(PivotError::DatasetNotConfigured);
    }
    if let Err(e) = validate_with_profile(source.fields(), config, profile) {
        log::debug!(target: LOG_TARGET, "validation failed: {}", e);
        return Err(e);
    }
    let calculator = PivotCalculator::new(source, config)?;
    Ok(calculator.calculate(collapsed))
}

/// Lists the records behind a cell. `None` for a key matches the whole axis,
/// so `(Some(row), None)` drills into a row total.
pub fn drill_down<S: RecordSource>(
    source: &S,
    config: &PivotConfig,
    row_key: Option<&str>,
    column_key: Option<&str>,
    max_records: usize,
) -> Result<DrillDownResult> {
    let calculator = PivotCalculator::new(source, config)?;
    let mut result = DrillDownResult::new(
        row_key.map(str::to_string),
        column_key.map(str::to_string),
        max_records,
    );

    for record in source.records() {
        if !calculator.contributes(record) {
            continue;
        }
        let row_matches = row_key.map_or(true, |k| derive_key(record, calculator.row_field) == k);
        let column_matches =
            column_key.map_or(true, |k| derive_key(record, calculator.column_field) == k);

        if row_matches && column_matches {
            result.total_count += 1;
            if result.record_ids.len() < max_records {
                result.record_ids.push(record.id().to_string());
            }
        }
    }

    result.is_truncated = result.total_count > max_records;
    Ok(result)
}
