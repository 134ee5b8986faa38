// In hyperframe-core/benches/hypergraph_bench.rs

use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray, TimestampNanosecondArray};
use arrow::record_batch::RecordBatch;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;

use hyperframe::{hypergraph, time_ring, EngineKind, Graph, HyperConfig, RingConfig, RingFormatters};

// --- Synthetic record tables ---

const BENCH_ROWS: usize = 50_000;

/// A log-like table: low-cardinality hosts, medium-cardinality users, a port and a timestamp.
fn generate_events(rows: usize) -> RecordBatch {
    let mut rng = rand::rng();

    let hosts: Vec<String> = (0..rows)
        .map(|_| format!("host-{}", rng.random_range(0..64)))
        .collect();
    let users: Vec<Option<String>> = (0..rows)
        .map(|_| {
            // Roughly 5% missing users.
            if rng.random_range(0..20) == 0 {
                None
            } else {
                Some(format!("user-{}", rng.random_range(0..2_000)))
            }
        })
        .collect();
    let ports: Vec<i64> = (0..rows).map(|_| rng.random_range(1..1024)).collect();
    let start = 1_514_764_800_000_000_000i64; // 2018-01-01
    let times: Vec<i64> = (0..rows)
        .map(|_| start + rng.random_range(0..90 * 86_400i64) * 1_000_000_000)
        .collect();

    RecordBatch::try_from_iter(vec![
        ("host", Arc::new(StringArray::from(hosts)) as ArrayRef),
        ("user", Arc::new(StringArray::from(users)) as ArrayRef),
        ("port", Arc::new(Int64Array::from(ports)) as ArrayRef),
        ("t", Arc::new(TimestampNanosecondArray::from(times)) as ArrayRef),
    ])
    .unwrap()
}

// --- Benchmark Suite ---

fn bench_hypergraph(c: &mut Criterion) {
    let table = generate_events(BENCH_ROWS);
    let entity_types: Vec<String> = ["host", "user", "port"].iter().map(|s| s.to_string()).collect();
    let g = Graph::new();

    let eager = HyperConfig::default();
    let partitioned = HyperConfig {
        engine: EngineKind::Partitioned {
            partition_rows: 8_192,
        },
        ..Default::default()
    };
    let direct = HyperConfig {
        direct: true,
        ..Default::default()
    };

    let mut group = c.benchmark_group("Hypergraph");
    group.throughput(criterion::Throughput::Elements(BENCH_ROWS as u64));

    group.bench_function("Hyperedges [Eager]", |b| {
        b.iter(|| black_box(hypergraph(&g, black_box(&table), Some(entity_types.as_slice()), &eager)))
    });
    group.bench_function("Hyperedges [Partitioned]", |b| {
        b.iter(|| {
            black_box(hypergraph(
                &g,
                black_box(&table),
                Some(entity_types.as_slice()),
                &partitioned,
            ))
        })
    });
    group.bench_function("Direct [Eager]", |b| {
        b.iter(|| black_box(hypergraph(&g, black_box(&table), Some(entity_types.as_slice()), &direct)))
    });

    group.finish();
}

fn bench_time_ring(c: &mut Criterion) {
    let nodes = generate_events(BENCH_ROWS);
    let g = Graph::new().with_nodes(nodes);
    let config = RingConfig::default();
    let formatters = RingFormatters::default();

    let mut group = c.benchmark_group("Time Ring");
    group.throughput(criterion::Throughput::Elements(BENCH_ROWS as u64));
    group.bench_function("Layout [auto unit]", |b| {
        b.iter(|| black_box(time_ring(black_box(&g), &config, &formatters)))
    });
    group.finish();
}

criterion_group!(benches, bench_hypergraph, bench_time_ring);
criterion_main!(benches);
