//! Benchmarks for the hierarchical sort
//!
//! Shapes:
//! - wide: few roots, many direct children
//! - deep: a single chain (worst case for the traversal stack)
//! - orphans: every subtree detached, depth resolved through the store

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hierarchy_sort::{sort, HierarchicalSort, NoAncestors, NodeId, NodeRecord, SortConfig};
use std::collections::HashMap;

fn wide(n: u64) -> Vec<NodeRecord> {
    (1..=n)
        .map(|id| {
            let group_root = (id - 1) / 50 * 50 + 1;
            NodeRecord::new(id, if group_root == id { 0 } else { group_root })
        })
        .rev()
        .collect()
}

fn deep(n: u64) -> Vec<NodeRecord> {
    (1..=n).rev().map(|id| NodeRecord::new(id, id - 1)).collect()
}

/// Records hang under ids that only the store knows about.
fn orphans(n: u64) -> (Vec<NodeRecord>, HashMap<NodeId, NodeId>) {
    let offset = 1_000_000;
    let records = (1..=n)
        .map(|id| NodeRecord::new(id, offset + id % 64))
        .collect();
    let store = (0..64)
        .map(|k| (offset + k, if k == 0 { 0 } else { offset + k - 1 }))
        .collect();
    (records, store)
}

fn bench_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");

    for size in [1_000u64, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size));

        let input = wide(size);
        group.bench_with_input(BenchmarkId::new("wide", size), &input, |b, input| {
            b.iter(|| black_box(sort(input, &NoAncestors)))
        });

        let input = deep(size);
        group.bench_with_input(BenchmarkId::new("deep", size), &input, |b, input| {
            b.iter(|| black_box(sort(input, &NoAncestors)))
        });
    }

    group.finish();
}

fn bench_orphan_lookups(c: &mut Criterion) {
    let (records, store) = orphans(10_000);
    let cached = HierarchicalSort::default();
    let uncached = HierarchicalSort::new(SortConfig::default().cache_lookups(false))
        .expect("valid config");

    let mut group = c.benchmark_group("orphans");
    group.bench_function("cached", |b| {
        b.iter(|| black_box(cached.sort_records(records.clone(), &store)))
    });
    group.bench_function("uncached", |b| {
        b.iter(|| black_box(uncached.sort_records(records.clone(), &store)))
    });
    group.finish();
}

criterion_group!(benches, bench_shapes, bench_orphan_lookups);
criterion_main!(benches);
