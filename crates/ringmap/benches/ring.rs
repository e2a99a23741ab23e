//! Benchmarks for ring map operations.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ringmap::{RingMap, RingMapBuilder};

fn build(nodes: usize, weight: usize) -> RingMap<u64, u64> {
    RingMapBuilder::new()
        .with_initial_nodes(nodes)
        .with_node_weight(weight)
        .with_seed(42)
        .build()
        .unwrap()
}

fn loaded(nodes: usize, weight: usize, keys: u64) -> RingMap<u64, u64> {
    let mut map = build(nodes, weight);
    for key in 0..keys {
        map.put(key, key).unwrap();
    }
    map
}

fn bench_put(c: &mut Criterion) {
    let weights: &[usize] = &[16, 128, 500];

    let mut group = c.benchmark_group("put");
    group.throughput(Throughput::Elements(10_000));
    for &weight in weights {
        group.bench_with_input(BenchmarkId::from_parameter(weight), &weight, |b, &weight| {
            b.iter_batched(
                || build(10, weight),
                |mut map| {
                    for key in 0..10_000u64 {
                        map.put(key, key).unwrap();
                    }
                    map
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let map = loaded(10, 500, 100_000);
    let mut key = 0u64;
    c.bench_function("get", |b| {
        b.iter(|| {
            key = (key + 7919) % 100_000;
            map.get(&key)
        });
    });
}

fn bench_add_node(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_node");
    group.sample_size(10);
    for &keys in &[10_000u64, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(keys), &keys, |b, &keys| {
            b.iter_batched(
                || loaded(10, 128, keys),
                |mut map| {
                    map.add_nodes(1).unwrap();
                    map
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_put, bench_get, bench_add_node);
criterion_main!(benches);
