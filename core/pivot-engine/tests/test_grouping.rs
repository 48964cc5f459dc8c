//! FILENAME: tests/test_grouping.rs
//! Integration tests for row grouping and collapse state.

mod common;

use common::{source_with, SalesFixture};
use dataset::{FieldDescriptor, FieldType, FieldValue, NumericKind};
use pivot_engine::{
    calculate_pivot, render_grid, AggregationType, CollapsedGroups, PivotConfig, PivotRowType,
    SortOrder,
};

fn grouped_config(aggregation: AggregationType) -> PivotConfig {
    PivotConfig::new("Region", "Product", "Sales", aggregation).with_row_group_field("Territory")
}

#[test]
fn test_groups_aggregate_their_members() {
    let source = SalesFixture::source();
    let result = calculate_pivot(&source, &grouped_config(AggregationType::Sum), &CollapsedGroups::new())
        .unwrap();

    let groups = result.groups.as_ref().unwrap();
    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["Lower", "Upper"]);

    let upper = result.group("Upper").unwrap();
    assert_eq!(upper.row_keys, vec!["East", "North"]);
    assert_eq!(upper.cell("Widget"), Some(42000.0));
    assert_eq!(upper.cell("Gadget"), Some(32500.0));
    assert_eq!(upper.total, Some(74500.0));
    assert!(!upper.collapsed);

    let lower = result.group("Lower").unwrap();
    assert_eq!(lower.row_keys, vec!["South"]);
    assert_eq!(lower.total, Some(53000.0));

    // Ungrouped figures are unaffected.
    assert_eq!(result.row_keys, vec!["East", "North", "South"]);
    assert_eq!(result.grand_total, Some(127500.0));
}

#[test]
fn test_group_average_is_mean_of_member_values() {
    let source = SalesFixture::source();
    let result =
        calculate_pivot(&source, &grouped_config(AggregationType::Average), &CollapsedGroups::new())
            .unwrap();

    // Eight records in Upper.
    assert_eq!(result.group("Upper").unwrap().total, Some(74500.0 / 8.0));
}

#[test]
fn test_group_order_follows_sort_order() {
    let source = SalesFixture::source();
    let config = grouped_config(AggregationType::Sum).with_sort_order(SortOrder::DataSourceOrder);
    let result = calculate_pivot(&source, &config, &CollapsedGroups::new()).unwrap();

    let labels: Vec<&str> = result.groups.as_ref().unwrap().iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["Upper", "Lower"]);
    assert_eq!(result.group("Upper").unwrap().row_keys, vec!["North", "East"]);
}

#[test]
fn test_collapsed_groups_hide_members_in_grid() {
    let source = SalesFixture::source();
    let collapsed: CollapsedGroups = ["Upper"].into_iter().collect();
    let result = calculate_pivot(&source, &grouped_config(AggregationType::Sum), &collapsed).unwrap();

    assert!(result.group("Upper").unwrap().collapsed);

    let grid = render_grid(&result);
    let types: Vec<PivotRowType> = grid.rows.iter().map(|r| r.row_type).collect();
    assert_eq!(
        types,
        vec![
            PivotRowType::Header,
            PivotRowType::Group,
            PivotRowType::Data,
            PivotRowType::Group,
            PivotRowType::Total,
        ]
    );
    assert_eq!(grid.visible_data_keys(), vec!["South"]);
    assert!(grid.rows[3].cells[0].is_collapsed);
    assert!(grid.rows[3].cells[0].is_expandable);
}

#[test]
fn test_toggle_round_trips_through_state_string() {
    let source = SalesFixture::source();
    let mut state = CollapsedGroups::new();
    let mut result = calculate_pivot(&source, &grouped_config(AggregationType::Sum), &state).unwrap();

    assert!(!result.toggle_group("Lower", &mut state));
    assert!(result.group("Lower").unwrap().collapsed);
    assert_eq!(render_grid(&result).visible_data_keys(), vec!["East", "North"]);

    // The host persists the state and reloads it later.
    let saved = state.to_state_string().unwrap();
    let restored = CollapsedGroups::from_state_string(&saved).unwrap();
    let reloaded = calculate_pivot(&source, &grouped_config(AggregationType::Sum), &restored).unwrap();
    assert!(reloaded.group("Lower").unwrap().collapsed);

    assert!(result.toggle_group("Lower", &mut state));
    assert!(!result.group("Lower").unwrap().collapsed);
    assert!(state.is_empty());
}

#[test]
fn test_first_group_value_wins_on_disagreement() {
    let fields = vec![
        FieldDescriptor::new("Team", FieldType::Text),
        FieldDescriptor::new("Month", FieldType::Text),
        FieldDescriptor::new("Hours", FieldType::Numeric(NumericKind::Decimal)),
        FieldDescriptor::new("Dept", FieldType::Text),
    ];
    let row = |team: &str, dept: &str, hours: f64| {
        vec![
            ("Team", FieldValue::text(team)),
            ("Month", FieldValue::text("Jan")),
            ("Hours", FieldValue::Number(hours)),
            ("Dept", FieldValue::text(dept)),
        ]
    };
    let source = source_with(
        fields,
        vec![
            ("1", row("Red", "Ops", 4.0)),
            ("2", row("Red", "Sales", 6.0)),
            ("3", row("Blue", "Sales", 1.0)),
        ],
    );
    let config = PivotConfig::new("Team", "Month", "Hours", AggregationType::Sum).with_row_group_field("Dept");
    let result = calculate_pivot(&source, &config, &CollapsedGroups::new()).unwrap();

    let ops = result.group("Ops").unwrap();
    assert_eq!(ops.row_keys, vec!["Red"]);
    assert_eq!(ops.total, Some(10.0));
    assert_eq!(result.group("Sales").unwrap().row_keys, vec!["Blue"]);
}

#[test]
fn test_missing_group_value_is_blank_group() {
    let source = SalesFixture::source();
    let config = PivotConfig::new("Region", "Product", "Sales", AggregationType::Count)
        .with_row_group_field("Notes");
    let result = calculate_pivot(&source, &config, &CollapsedGroups::new()).unwrap();

    let groups = result.groups.as_ref().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].label, pivot_engine::BLANK_LABEL);
    assert_eq!(groups[0].total, Some(12.0));
}
