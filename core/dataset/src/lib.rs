//! FILENAME: core/dataset/src/lib.rs
//! PURPOSE: Input boundary for the matrix pivot engine.
//! CONTEXT: Re-exports the typed value, field descriptor and record contracts
//! that the upstream data layer implements and `pivot-engine` reads.

pub mod field;
pub mod record;
pub mod value;

// Re-export commonly used types at the crate root
pub use field::{FieldDescriptor, FieldType, NumericKind};
pub use record::{DataRecord, Record, RecordSet, RecordSource};
pub use value::FieldValue;
