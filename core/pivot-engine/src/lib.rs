//! FILENAME: core/pivot-engine/src/lib.rs
//! Matrix pivot subsystem.
//!
//! Cross-tabulates a flat record set along a row field and a column field,
//! aggregating a value field into each intersection. Records come from any
//! `dataset::RecordSource`.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the pivot IS)
//! - `options`: Loose host options parsed into a definition
//! - `validate`: Config checks against the field schema
//! - `cache`: Per-call internal representation (HOW we compute)
//! - `engine`: Calculation engine (HOW we calculate)
//! - `grouping`: Optional row clustering and collapse state
//! - `view`: Result and renderable grid (WHAT we display)

pub mod definition;
pub mod error;
pub mod options;
pub mod validate;
pub mod sort;
pub mod cache;
pub mod engine;
pub mod grouping;
pub mod view;

pub use definition::*;
pub use error::{PivotError, Result};
pub use options::PivotOptions;
pub use validate::{validate, validate_with_profile};
pub use sort::{compare_in_order, smart_compare, sort_labels};
pub use engine::{
    calculate_pivot, calculate_pivot_with_profile, derive_key, drill_down, transform,
    PivotCalculator, BLANK_LABEL,
};
pub use grouping::{CollapsedGroups, PivotGroup};
pub use view::*;
