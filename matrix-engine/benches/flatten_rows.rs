//! FILENAME: matrix-engine/benches/flatten_rows.rs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use matrix_engine::transform_matrix;
use matrix_model::{
    AxisLevel, CellValue, FormattingSettings, MatrixAxis, MatrixDataView, MatrixNode,
    MeasureDescriptor, MeasureValue,
};

fn measure(value: f64) -> MeasureValue {
    MeasureValue::new(CellValue::Number(value))
}

/// A fully expanded two-level tree: `groups` regions, each with `leaves`
/// cities plus a subtotal, plus the grand total.
fn build_dataview(groups: usize, leaves: usize) -> MatrixDataView {
    let mut top: Vec<MatrixNode> = Vec::with_capacity(groups + 1);
    for g in 0..groups {
        let mut children: Vec<MatrixNode> = (0..leaves)
            .map(|c| {
                MatrixNode::leaf(
                    Some(CellValue::text(format!("City_{g}_{c}"))),
                    1,
                    vec![measure((g * leaves + c) as f64)],
                )
            })
            .collect();
        children.push(MatrixNode::subtotal(1, vec![measure(g as f64)]));
        top.push(MatrixNode::branch(
            Some(CellValue::text(format!("Region_{g}"))),
            0,
            children,
        ));
    }
    top.push(MatrixNode::subtotal(0, vec![measure(0.0)]));

    let mut root = MatrixNode::branch(None, 0, top);
    root.child_identity_fields = Some(vec!["Region".to_string()]);

    MatrixDataView {
        rows: MatrixAxis {
            levels: vec![
                AxisLevel::new(MeasureDescriptor::new("Region"), true),
                AxisLevel::new(MeasureDescriptor::new("City"), false),
            ],
            root,
        },
        columns: MatrixAxis::default(),
        value_sources: vec![MeasureDescriptor::new("Revenue").with_format("#,##0.0")],
    }
}

fn bench_flatten_rows(c: &mut Criterion) {
    let settings = FormattingSettings::default();
    let mut group = c.benchmark_group("flatten_rows");

    for &(groups, leaves) in &[(50usize, 20usize), (200, 50)] {
        let dataview = build_dataview(groups, leaves);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", groups, leaves)),
            &dataview,
            |b, dataview| {
                b.iter(|| transform_matrix(black_box(dataview), black_box(&settings)).unwrap())
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_flatten_rows);
criterion_main!(benches);
