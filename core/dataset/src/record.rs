//! FILENAME: core/dataset/src/record.rs
//! PURPOSE: The read-only record contract and an owned in-memory record set.
//! CONTEXT: The pivot engine only ever reads through `Record` and
//! `RecordSource`. `DataRecord` and `RecordSet` are the owned implementations
//! used by hosts that already materialized their rows, and by the tests.

use crate::field::FieldDescriptor;
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the source data set.
pub trait Record {
    /// Stable identifier of the record.
    fn id(&self) -> &str;

    /// Raw value of a field, `None` when the record does not carry it.
    fn raw(&self, field: &str) -> Option<&FieldValue>;

    /// Formatted display text of a field, when the source provides one.
    fn formatted(&self, _field: &str) -> Option<String> {
        None
    }
}

/// An ordered, read-only collection of records plus their field descriptors.
pub trait RecordSource {
    type Record: Record;

    fn fields(&self) -> &[FieldDescriptor];

    fn records(&self) -> &[Self::Record];

    fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().iter().find(|f| f.name == name)
    }
}

/// A record stored as name-keyed maps of raw and formatted values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    pub id: String,
    pub values: HashMap<String, FieldValue>,
    #[serde(default)]
    pub formatted: HashMap<String, String>,
}

impl DataRecord {
    pub fn new(id: impl Into<String>) -> Self {
        DataRecord {
            id: id.into(),
            values: HashMap::new(),
            formatted: HashMap::new(),
        }
    }

    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    pub fn with_formatted(mut self, field: impl Into<String>, text: impl Into<String>) -> Self {
        self.formatted.insert(field.into(), text.into());
        self
    }

    pub fn set_value(&mut self, field: impl Into<String>, value: FieldValue) {
        self.values.insert(field.into(), value);
    }
}

impl Record for DataRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn raw(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    fn formatted(&self, field: &str) -> Option<String> {
        self.formatted.get(field).cloned()
    }
}

/// Owned record set: field descriptors plus records in source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    pub fields: Vec<FieldDescriptor>,
    pub records: Vec<DataRecord>,
}

impl RecordSet {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        RecordSet {
            fields,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: DataRecord) {
        self.records.push(record);
    }

    pub fn with_record(mut self, record: DataRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for RecordSet {
    type Record = DataRecord;

    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    fn records(&self) -> &[DataRecord] {
        &self.records
    }
}
