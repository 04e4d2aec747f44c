//! Snapshot pipeline benchmarks.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use typesnap_bench::fixtures::synthetic_graph;
use typesnap_codegen::{Generator, SnapshotConfig, collect, resolve_names};

fn benchmark_collect(c: &mut Criterion) {
    let (graph, roots) = synthetic_graph(32, 32);

    c.bench_function("collect_32x32", |b| {
        b.iter(|| collect(black_box(&graph), black_box(&roots)))
    });
}

fn benchmark_resolve_names(c: &mut Criterion) {
    let (graph, roots) = synthetic_graph(32, 32);
    let config = SnapshotConfig::new();
    let retained = collect(&graph, &roots);

    c.bench_function("resolve_names_32x32", |b| {
        b.iter(|| {
            let mut retained = retained.clone();
            resolve_names(black_box(&graph), &mut retained, &config)
        })
    });
}

fn benchmark_generate(c: &mut Criterion) {
    let (graph, roots) = synthetic_graph(16, 16);
    let mut generator = Generator::with_graph(graph, SnapshotConfig::new().suffix("V1"));
    for root in roots {
        generator.add_root(root);
    }

    c.bench_function("generate_16x16", |b| {
        b.iter(|| black_box(&generator).generate())
    });
}

criterion_group!(
    benches,
    benchmark_collect,
    benchmark_resolve_names,
    benchmark_generate
);
criterion_main!(benches);
