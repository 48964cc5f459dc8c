//! FILENAME: core/pivot-engine/src/validate.rs
//! Config Validator - rejects invalid field/aggregation combinations before
//! any record is scanned. Pure predicate over immutable inputs.

use crate::definition::{AggregationType, PivotConfig, ValidationProfile};
use crate::error::{PivotError, Result};
use dataset::{FieldDescriptor, FieldType};

/// Validates a config against the field descriptors using the default profile.
pub fn validate(fields: &[FieldDescriptor], config: &PivotConfig) -> Result<()> {
    validate_with_profile(fields, config, &ValidationProfile::default())
}

/// Validates a config against the field descriptors under a deployment profile.
pub fn validate_with_profile(
    fields: &[FieldDescriptor],
    config: &PivotConfig,
    profile: &ValidationProfile,
) -> Result<()> {
    let row = lookup(fields, &config.row_field)?;
    let column = lookup(fields, &config.column_field)?;
    let value = lookup(fields, &config.value_field)?;
    let group = match config.row_group_field {
        Some(ref name) => Some(lookup(fields, name)?),
        None => None,
    };

    if !profile.allow_reference_grouping {
        for field in [Some(row), Some(column), group].into_iter().flatten() {
            if field.field_type.is_reference() {
                return Err(PivotError::UnsupportedGroupingField {
                    field: field.name.clone(),
                });
            }
        }
    }

    check_aggregation(config.aggregation, value)
}

fn lookup<'a>(fields: &'a [FieldDescriptor], name: &str) -> Result<&'a FieldDescriptor> {
    fields
        .iter()
        .find(|f| f.name == name)
        .ok_or_else(|| PivotError::MissingField {
            field: name.to_string(),
        })
}

fn check_aggregation(aggregation: AggregationType, value: &FieldDescriptor) -> Result<()> {
    let compatible = match (aggregation, value.field_type) {
        (AggregationType::Count, _) => true,
        (AggregationType::Sum | AggregationType::Average, FieldType::Numeric(_)) => true,
        (AggregationType::Min | AggregationType::Max, FieldType::Numeric(_) | FieldType::Temporal) => {
            true
        }
        _ => false,
    };

    if compatible {
        Ok(())
    } else {
        Err(PivotError::IncompatibleAggregation {
            aggregation,
            field: value.name.clone(),
            field_type: value.field_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset::NumericKind;

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("Region", FieldType::Text),
            FieldDescriptor::new("Status", FieldType::Choice),
            FieldDescriptor::new("Owner", FieldType::Reference),
            FieldDescriptor::new("Amount", FieldType::Numeric(NumericKind::Currency)),
            FieldDescriptor::new("Closed", FieldType::Temporal),
            FieldDescriptor::new("Notes", FieldType::Text),
        ]
    }

    fn config(value: &str, aggregation: AggregationType) -> PivotConfig {
        PivotConfig::new("Region", "Status", value, aggregation)
    }

    #[test]
    fn accepts_valid_combinations() {
        let fields = fields();
        assert!(validate(&fields, &config("Amount", AggregationType::Sum)).is_ok());
        assert!(validate(&fields, &config("Amount", AggregationType::Average)).is_ok());
        assert!(validate(&fields, &config("Closed", AggregationType::Min)).is_ok());
        assert!(validate(&fields, &config("Closed", AggregationType::Max)).is_ok());
        assert!(validate(&fields, &config("Notes", AggregationType::Count)).is_ok());
        assert!(validate(&fields, &config("Owner", AggregationType::Count)).is_ok());
    }

    #[test]
    fn missing_fields_are_named() {
        let fields = fields();

        let mut cfg = config("Amount", AggregationType::Sum);
        cfg.column_field = "Nope".to_string();
        match validate(&fields, &cfg) {
            Err(PivotError::MissingField { field }) => assert_eq!(field, "Nope"),
            other => panic!("expected MissingField, got {:?}", other),
        }

        let cfg = config("Amount", AggregationType::Sum).with_row_group_field("Team");
        assert!(matches!(
            validate(&fields, &cfg),
            Err(PivotError::MissingField { ref field }) if field == "Team"
        ));
    }

    #[test]
    fn sum_and_average_need_numeric() {
        let fields = fields();
        for aggregation in [AggregationType::Sum, AggregationType::Average] {
            for value in ["Notes", "Closed", "Status"] {
                assert!(matches!(
                    validate(&fields, &config(value, aggregation)),
                    Err(PivotError::IncompatibleAggregation { .. })
                ));
            }
        }
    }

    #[test]
    fn min_max_reject_text() {
        let fields = fields();
        let err = validate(&fields, &config("Notes", AggregationType::Min)).unwrap_err();
        assert_eq!(err.to_string(), "MIN cannot be applied to field 'Notes' of type text");
    }

    #[test]
    fn reference_grouping_follows_profile() {
        let fields = fields();
        let mut cfg = config("Amount", AggregationType::Sum);
        cfg.row_field = "Owner".to_string();

        assert!(validate(&fields, &cfg).is_ok());
        match validate_with_profile(&fields, &cfg, &ValidationProfile::strict()) {
            Err(PivotError::UnsupportedGroupingField { field }) => assert_eq!(field, "Owner"),
            other => panic!("expected UnsupportedGroupingField, got {:?}", other),
        }

        // Aggregating over a reference (COUNT) is not grouping by it.
        let cfg = config("Owner", AggregationType::Count);
        assert!(validate_with_profile(&fields, &cfg, &ValidationProfile::strict()).is_ok());
    }
}
