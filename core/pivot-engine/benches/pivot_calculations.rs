//! FILENAME: core/pivot-engine/benches/pivot_calculations.rs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dataset::{DataRecord, FieldDescriptor, FieldType, NumericKind, RecordSet};
use pivot_engine::{calculate_pivot, AggregationType, CollapsedGroups, PivotConfig};

fn build_source(records: usize) -> RecordSet {
    let fields = vec![
        FieldDescriptor::new("Customer", FieldType::Text),
        FieldDescriptor::new("Month", FieldType::Text),
        FieldDescriptor::new("Segment", FieldType::Text),
        FieldDescriptor::new("Amount", FieldType::Numeric(NumericKind::Currency)),
    ];
    let mut set = RecordSet::new(fields);
    for i in 0..records {
        let amount = if i % 17 == 0 { None } else { Some((i % 100) as f64) };
        set.push(
            DataRecord::new(format!("r{}", i))
                .with_value("Customer", format!("Customer{}", i % 500))
                .with_value("Month", format!("M{}", i % 12 + 1))
                .with_value("Segment", format!("Segment{}", i % 500 / 50))
                .with_value("Amount", amount),
        );
    }
    set
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    for &records in &[1_000usize, 10_000, 100_000] {
        let source = build_source(records);
        group.throughput(Throughput::Elements(records as u64));
        for aggregation in [AggregationType::Sum, AggregationType::Average] {
            let config = PivotConfig::new("Customer", "Month", "Amount", aggregation);
            group.bench_with_input(
                BenchmarkId::new(aggregation.to_string(), records),
                &source,
                |b, source| {
                    b.iter(|| {
                        black_box(calculate_pivot(source, &config, &CollapsedGroups::new()).unwrap())
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_grouped(c: &mut Criterion) {
    let source = build_source(100_000);
    let config = PivotConfig::new("Customer", "Month", "Amount", AggregationType::Average)
        .with_row_group_field("Segment");
    let collapsed: CollapsedGroups = ["Segment3", "Segment7"].into_iter().collect();

    c.bench_function("transform_grouped_100k", |b| {
        b.iter(|| black_box(calculate_pivot(&source, &config, &collapsed).unwrap()))
    });
}

criterion_group!(benches, bench_transform, bench_grouped);
criterion_main!(benches);
