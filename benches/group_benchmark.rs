//! Grouping and aggregation benchmarks.
//!
//! Benchmarks:
//! - group construction by key cardinality (sequential vs parallel masks)
//! - single-target sum over groups
//! - multi-request summarize

use colframe::{ColumnSource, DataFrame, GroupConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROWS: usize = 10_000;

/// Helper: a frame with an integer key column of the given cardinality and
/// two numeric value columns.
fn setup_frame(n_rows: usize, cardinality: i64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(42);
    let keys: Vec<i64> = (0..n_rows).map(|_| rng.gen_range(0..cardinality)).collect();
    let ints: Vec<i64> = (0..n_rows).map(|_| rng.gen_range(-1_000..1_000)).collect();
    let floats: Vec<f64> = (0..n_rows).map(|_| rng.gen::<f64>()).collect();
    DataFrame::new(vec![
        ("key", ColumnSource::from(keys)),
        ("i", ColumnSource::from(ints)),
        ("f", ColumnSource::from(floats)),
    ])
    .unwrap()
}

fn bench_group_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_construction");
    group.throughput(Throughput::Elements(ROWS as u64));
    for cardinality in [4i64, 64, 512] {
        let df = setup_frame(ROWS, cardinality);
        group.bench_with_input(
            BenchmarkId::new("sequential", cardinality),
            &df,
            |b, df| {
                let config = GroupConfig::new().with_parallel(false);
                b.iter(|| black_box(df.group_with_config(&["key"], config.clone()).unwrap()));
            },
        );
        group.bench_with_input(BenchmarkId::new("parallel", cardinality), &df, |b, df| {
            let config = GroupConfig::new().with_parallel_threshold(1);
            b.iter(|| black_box(df.group_with_config(&["key"], config.clone()).unwrap()));
        });
    }
    group.finish();
}

fn bench_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_sum");
    for cardinality in [4i64, 64] {
        let grouped = setup_frame(ROWS, cardinality).group(&["key"]).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(cardinality),
            &grouped,
            |b, grouped| {
                b.iter(|| black_box(grouped.sum(&["i"]).unwrap()));
            },
        );
    }
    group.finish();
}

fn bench_summarize(c: &mut Criterion) {
    let grouped = setup_frame(ROWS, 64).group(&["key"]).unwrap();
    c.bench_function("summarize_count_sum_mean", |b| {
        b.iter(|| {
            black_box(
                grouped
                    .summarize(|g| Ok(vec![g.count(&["i"]), g.sum(&["i"]), g.mean(&["f"])]))
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_group_construction, bench_sum, bench_summarize);
criterion_main!(benches);
