//! FILENAME: tests/common/mod.rs
//! Fixtures for pivot engine integration tests.

#![allow(dead_code)]

use dataset::{DataRecord, FieldDescriptor, FieldType, FieldValue, NumericKind, RecordSet};

/// Regional sales data: 12 records over 3 regions, 2 products and 2 quarters.
pub struct SalesFixture;

impl SalesFixture {
    pub fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("Region", FieldType::Text),
            FieldDescriptor::new("Product", FieldType::Text),
            FieldDescriptor::new("Quarter", FieldType::Text),
            FieldDescriptor::new("Sales", FieldType::Numeric(NumericKind::Currency)),
            FieldDescriptor::new("Quantity", FieldType::Numeric(NumericKind::WholeNumber)),
            FieldDescriptor::new("Territory", FieldType::Text),
            FieldDescriptor::new("Status", FieldType::Choice),
            FieldDescriptor::new("Shipped", FieldType::TwoState),
            FieldDescriptor::new("OrderDate", FieldType::Temporal),
            FieldDescriptor::new("Owner", FieldType::Reference),
            FieldDescriptor::new("Notes", FieldType::Text),
        ]
    }

    pub fn data() -> Vec<(&'static str, &'static str, &'static str, f64, f64)> {
        vec![
            ("North", "Widget", "Q1", 10000.0, 100.0),
            ("North", "Widget", "Q2", 12000.0, 120.0),
            ("North", "Gadget", "Q1", 8000.0, 80.0),
            ("North", "Gadget", "Q2", 9000.0, 90.0),
            ("South", "Widget", "Q1", 15000.0, 150.0),
            ("South", "Widget", "Q2", 14000.0, 140.0),
            ("South", "Gadget", "Q1", 11000.0, 110.0),
            ("South", "Gadget", "Q2", 13000.0, 130.0),
            ("East", "Widget", "Q1", 9000.0, 90.0),
            ("East", "Widget", "Q2", 11000.0, 110.0),
            ("East", "Gadget", "Q1", 7000.0, 70.0),
            ("East", "Gadget", "Q2", 8500.0, 85.0),
        ]
    }

    pub fn territory(region: &str) -> &'static str {
        match region {
            "South" => "Lower",
            _ => "Upper",
        }
    }

    /// The full record set. Records carry ids "s0".."s11".
    pub fn source() -> RecordSet {
        let mut set = RecordSet::new(Self::fields());
        for (i, (region, product, quarter, sales, quantity)) in Self::data().into_iter().enumerate() {
            let (status_raw, status_text) = if i % 3 == 0 { ("2", "Closed") } else { ("1", "Open") };
            let shipped = i % 2 == 0;
            set.push(
                DataRecord::new(format!("s{}", i))
                    .with_value("Region", region)
                    .with_value("Product", product)
                    .with_value("Quarter", quarter)
                    .with_value("Sales", sales)
                    .with_value("Quantity", quantity)
                    .with_value("Territory", Self::territory(region))
                    .with_value("Status", status_raw)
                    .with_formatted("Status", status_text)
                    .with_value("Shipped", shipped)
                    .with_formatted("Shipped", if shipped { "Yes" } else { "No" })
                    .with_value("Owner", FieldValue::reference(format!("user-{}", i % 2)))
                    .with_formatted("Owner", if i % 2 == 0 { "Ada" } else { "Grace" }),
            );
        }
        set
    }
}

/// A source with the given fields and records built from `(id, [(field, value)])`.
pub fn source_with(fields: Vec<FieldDescriptor>, rows: Vec<(&str, Vec<(&str, FieldValue)>)>) -> RecordSet {
    let mut set = RecordSet::new(fields);
    for (id, values) in rows {
        let mut record = DataRecord::new(id);
        for (field, value) in values {
            record.set_value(field, value);
        }
        set.push(record);
    }
    set
}

/// Assert that two floats agree to within 1e-9.
pub fn assert_close(actual: Option<f64>, expected: f64) {
    match actual {
        Some(v) => assert!((v - expected).abs() < 1e-9, "expected {}, got {}", expected, v),
        None => panic!("expected {}, got no value", expected),
    }
}
