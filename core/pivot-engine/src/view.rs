//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - Presentation-ready output.
//!
//! `PivotResult` is the structured result of one transform: ordered axis
//! labels, a sparse cell map and optional totals. `render_grid` lays a result
//! out as rows of typed cells for a grid widget. Cells absent from the result
//! render as placeholders, never as zero.

use crate::definition::AggregationType;
use crate::grouping::{CollapsedGroups, PivotGroup};
use chrono::{DateTime, NaiveDateTime};
use dataset::FieldValue;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Label of the totals row and column.
pub const TOTAL_LABEL: &str = "Total";

// ============================================================================
// RESULT
// ============================================================================

/// What the aggregated scalars represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Number,
    /// Milliseconds since the Unix epoch (MIN/MAX over a date field).
    Temporal,
}

/// Counters collected while scanning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotStats {
    pub total_records: usize,
    /// Records routed to a cell.
    pub contributing_records: usize,
    /// Records dropped because their value was null under a non-COUNT aggregation.
    pub skipped_records: usize,
    pub cell_count: usize,
}

/// The result of one pivot transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotResult {
    pub row_keys: Vec<String>,
    pub column_keys: Vec<String>,

    /// row key -> column key -> aggregate. A missing entry means no
    /// contributing records.
    pub cells: FxHashMap<String, FxHashMap<String, f64>>,

    /// Per-row totals (across all columns), when requested.
    pub row_totals: Option<FxHashMap<String, f64>>,

    /// Per-column totals (across all rows), when requested.
    pub column_totals: Option<FxHashMap<String, f64>>,

    pub grand_total: Option<f64>,

    pub aggregation: AggregationType,
    pub value_kind: ValueKind,

    /// Row groups, when a grouping field is configured.
    pub groups: Option<Vec<PivotGroup>>,

    pub stats: PivotStats,
}

impl PivotResult {
    /// An empty result: no axes and no cells. Totals that are defined over the
    /// empty set (COUNT, SUM) report 0.
    pub fn empty(
        aggregation: AggregationType,
        value_kind: ValueKind,
        show_row_totals: bool,
        show_column_totals: bool,
    ) -> Self {
        let grand_total = if (show_row_totals || show_column_totals) && aggregation.defined_on_empty() {
            Some(0.0)
        } else {
            None
        };
        PivotResult {
            row_keys: Vec::new(),
            column_keys: Vec::new(),
            cells: FxHashMap::default(),
            row_totals: show_row_totals.then(FxHashMap::default),
            column_totals: show_column_totals.then(FxHashMap::default),
            grand_total,
            aggregation,
            value_kind,
            groups: None,
            stats: PivotStats::default(),
        }
    }

    /// Looks up one cell.
    pub fn cell(&self, row_key: &str, column_key: &str) -> Option<f64> {
        self.cells.get(row_key).and_then(|cols| cols.get(column_key)).copied()
    }

    pub fn row_total(&self, row_key: &str) -> Option<f64> {
        self.row_totals.as_ref().and_then(|t| t.get(row_key)).copied()
    }

    pub fn column_total(&self, column_key: &str) -> Option<f64> {
        self.column_totals.as_ref().and_then(|t| t.get(column_key)).copied()
    }

    /// Number of populated cells.
    pub fn cell_count(&self) -> usize {
        self.cells.values().map(|cols| cols.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_keys.is_empty() && self.column_keys.is_empty()
    }

    pub fn group(&self, label: &str) -> Option<&PivotGroup> {
        self.groups.as_ref()?.iter().find(|g| g.label == label)
    }

    /// Flips a group in the caller's durable state and mirrors the new state
    /// onto this result, so it can be re-rendered without recomputing.
    /// Returns true when the group is now expanded.
    pub fn toggle_group(&mut self, label: &str, state: &mut CollapsedGroups) -> bool {
        let expanded = state.toggle(label);
        self.apply_collapsed(state);
        expanded
    }

    /// Re-reads every group's collapsed flag from `state`.
    pub fn apply_collapsed(&mut self, state: &CollapsedGroups) {
        if let Some(groups) = self.groups.as_mut() {
            for group in groups {
                group.collapsed = state.is_collapsed(&group.label);
            }
        }
    }
}

// ============================================================================
// DRILL DOWN
// ============================================================================

/// Source records behind one cell (or one whole row/column).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillDownResult {
    pub row_key: Option<String>,
    pub column_key: Option<String>,
    pub record_ids: Vec<String>,
    pub total_count: usize,
    pub max_records: usize,
    pub is_truncated: bool,
}

impl DrillDownResult {
    pub fn new(row_key: Option<String>, column_key: Option<String>, max_records: usize) -> Self {
        DrillDownResult {
            row_key,
            column_key,
            record_ids: Vec::new(),
            total_count: 0,
            max_records,
            is_truncated: false,
        }
    }
}

// ============================================================================
// RENDER GRID
// ============================================================================

/// The type of a cell in the rendered grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PivotCellType {
    /// Top-left cell.
    Corner,
    ColumnHeader,
    RowHeader,
    /// Label cell of a group row.
    GroupHeader,
    /// Aggregated cell of a data row.
    Data,
    /// Aggregated cell of a group row.
    GroupData,
    /// Cell with no contributing records.
    Placeholder,
    /// Right-hand totals column.
    RowTotal,
    /// Bottom totals row.
    ColumnTotal,
    GrandTotal,
}

/// Display value of a grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PivotCellValue {
    Empty,
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl PivotCellValue {
    /// Converts an aggregate back to its presentation form.
    pub fn from_aggregate(value: f64, kind: ValueKind) -> Self {
        match kind {
            ValueKind::Number => PivotCellValue::Number(value),
            ValueKind::Temporal => DateTime::from_timestamp_millis(value as i64)
                .map(|dt| PivotCellValue::Date(dt.naive_utc()))
                .unwrap_or(PivotCellValue::Number(value)),
        }
    }

    pub fn formatted(&self) -> String {
        match self {
            PivotCellValue::Empty => String::new(),
            PivotCellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            PivotCellValue::Date(dt) => FieldValue::Date(*dt).display_value(),
            PivotCellValue::Text(s) => s.clone(),
        }
    }
}

/// A single cell in the rendered grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotViewCell {
    pub value: PivotCellValue,
    pub cell_type: PivotCellType,
    /// Pre-formatted display string.
    pub formatted_value: String,
    pub indent_level: u8,
    pub is_expandable: bool,
    pub is_collapsed: bool,
    pub is_bold: bool,
}

impl PivotViewCell {
    fn new(value: PivotCellValue, cell_type: PivotCellType) -> Self {
        PivotViewCell {
            formatted_value: value.formatted(),
            value,
            cell_type,
            indent_level: 0,
            is_expandable: false,
            is_collapsed: false,
            is_bold: false,
        }
    }

    pub fn corner() -> Self {
        Self::new(PivotCellValue::Empty, PivotCellType::Corner)
    }

    pub fn placeholder() -> Self {
        Self::new(PivotCellValue::Empty, PivotCellType::Placeholder)
    }

    pub fn label(text: impl Into<String>, cell_type: PivotCellType) -> Self {
        Self::new(PivotCellValue::Text(text.into()), cell_type)
    }

    /// An aggregate cell; `None` becomes a placeholder.
    pub fn aggregate(value: Option<f64>, kind: ValueKind, cell_type: PivotCellType) -> Self {
        match value {
            Some(v) => Self::new(PivotCellValue::from_aggregate(v, kind), cell_type),
            None => Self::placeholder(),
        }
    }

    fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    fn indented(mut self, level: u8) -> Self {
        self.indent_level = level;
        self
    }
}

/// Row types of the rendered grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PivotRowType {
    Header,
    Data,
    Group,
    Total,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotViewRow {
    pub row_type: PivotRowType,
    /// Row key for data rows, group label for group rows.
    pub key: Option<String>,
    pub cells: Vec<PivotViewCell>,
}

/// The complete rendered grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotGrid {
    pub rows: Vec<PivotViewRow>,
    pub col_count: usize,
}

impl PivotGrid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Data rows currently visible (collapsed groups hide their members).
    pub fn visible_data_keys(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|r| r.row_type == PivotRowType::Data)
            .filter_map(|r| r.key.as_deref())
            .collect()
    }
}

/// Lays a result out as a grid: header row, body rows (grouped when the
/// result carries groups), and a totals row when column totals were computed.
pub fn render_grid(result: &PivotResult) -> PivotGrid {
    let kind = result.value_kind;
    let show_total_column = result.row_totals.is_some();
    let mut rows = Vec::with_capacity(result.row_keys.len() + 2);

    // Header
    let mut header = Vec::with_capacity(result.column_keys.len() + 2);
    header.push(PivotViewCell::corner());
    for column in &result.column_keys {
        header.push(PivotViewCell::label(column.clone(), PivotCellType::ColumnHeader).bold());
    }
    if show_total_column {
        header.push(PivotViewCell::label(TOTAL_LABEL, PivotCellType::ColumnHeader).bold());
    }
    let col_count = header.len();
    rows.push(PivotViewRow {
        row_type: PivotRowType::Header,
        key: None,
        cells: header,
    });

    // Body
    match result.groups {
        Some(ref groups) => {
            for group in groups {
                rows.push(group_row(result, group));
                if group.collapsed {
                    continue;
                }
                for row_key in &group.row_keys {
                    rows.push(data_row(result, row_key, 1));
                }
            }
        }
        None => {
            for row_key in &result.row_keys {
                rows.push(data_row(result, row_key, 0));
            }
        }
    }

    // Totals row
    if let Some(ref column_totals) = result.column_totals {
        let mut cells = Vec::with_capacity(col_count);
        cells.push(PivotViewCell::label(TOTAL_LABEL, PivotCellType::RowHeader).bold());
        for column in &result.column_keys {
            let total = column_totals.get(column).copied();
            cells.push(PivotViewCell::aggregate(total, kind, PivotCellType::ColumnTotal).bold());
        }
        if show_total_column {
            cells.push(
                PivotViewCell::aggregate(result.grand_total, kind, PivotCellType::GrandTotal).bold(),
            );
        }
        rows.push(PivotViewRow {
            row_type: PivotRowType::Total,
            key: None,
            cells,
        });
    }

    PivotGrid { rows, col_count }
}

fn data_row(result: &PivotResult, row_key: &str, indent: u8) -> PivotViewRow {
    let kind = result.value_kind;
    let mut cells = Vec::with_capacity(result.column_keys.len() + 2);
    cells.push(PivotViewCell::label(row_key, PivotCellType::RowHeader).indented(indent));
    for column in &result.column_keys {
        cells.push(PivotViewCell::aggregate(
            result.cell(row_key, column),
            kind,
            PivotCellType::Data,
        ));
    }
    if result.row_totals.is_some() {
        cells.push(
            PivotViewCell::aggregate(result.row_total(row_key), kind, PivotCellType::RowTotal)
                .bold(),
        );
    }
    PivotViewRow {
        row_type: PivotRowType::Data,
        key: Some(row_key.to_string()),
        cells,
    }
}

fn group_row(result: &PivotResult, group: &PivotGroup) -> PivotViewRow {
    let kind = result.value_kind;
    let mut label = PivotViewCell::label(group.label.clone(), PivotCellType::GroupHeader).bold();
    label.is_expandable = true;
    label.is_collapsed = group.collapsed;

    let mut cells = Vec::with_capacity(result.column_keys.len() + 2);
    cells.push(label);
    for column in &result.column_keys {
        cells.push(PivotViewCell::aggregate(group.cell(column), kind, PivotCellType::GroupData).bold());
    }
    if result.row_totals.is_some() {
        cells.push(PivotViewCell::aggregate(group.total, kind, PivotCellType::RowTotal).bold());
    }
    PivotViewRow {
        row_type: PivotRowType::Group,
        key: Some(group.label.clone()),
        cells,
    }
}
