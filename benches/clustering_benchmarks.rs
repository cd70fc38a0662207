//! Benchmarks for agglomeration and node learning.
//!
//! Run with: `cargo bench --bench clustering_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use htm_zeta::prelude::*;

fn random_stream(rng: &mut Random, len: usize, symbols: usize) -> Vec<usize> {
    (0..len).map(|_| rng.get_usize(symbols)).collect()
}

/// Agglomeration is cubic in the number of items; track how it scales.
fn bench_agglomeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("agglomeration");
    let mut rng = Random::new(42);

    for &size in &[16usize, 64, 128] {
        let items: Vec<f64> = (0..size).map(|_| rng.get_real64() * 100.0).collect();

        group.throughput(Throughput::Elements(size as u64));
        for linkage in [Linkage::GroupAverage, Linkage::Shortest] {
            group.bench_with_input(
                BenchmarkId::new(linkage.name(), size),
                &items,
                |b, items| {
                    let clustering = AgglomerativeClustering::new(linkage);
                    b.iter(|| {
                        black_box(
                            clustering
                                .fit(items.clone(), |x: &f64, y: &f64| (x - y).abs())
                                .unwrap(),
                        )
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_temporal_pooler_learn(c: &mut Criterion) {
    let mut group = c.benchmark_group("temporal_pooler_learn");
    let mut rng = Random::new(42);

    for &coincidences in &[8usize, 32, 64] {
        let stream = random_stream(&mut rng, 2000, coincidences);

        group.bench_with_input(
            BenchmarkId::from_parameter(coincidences),
            &stream,
            |b, stream| {
                b.iter(|| {
                    let mut tp = TemporalPooler::new(4, Linkage::GroupAverage).unwrap();
                    tp.learn(black_box(stream), coincidences).unwrap();
                    tp
                });
            },
        );
    }

    group.finish();
}

fn bench_hierarchy_learn(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy_learn");
    group.sample_size(20);
    let mut rng = Random::new(7);

    let params = NodeParams {
        num_groups: 4,
        ..Default::default()
    };
    let streams: Vec<Vec<f64>> = (0..8)
        .map(|_| (0..500).map(|_| rng.get_real64()).collect())
        .collect();

    group.bench_function("eight_continuous_leaves", |b| {
        b.iter(|| {
            let leaves: Vec<Node> = streams
                .iter()
                .map(|s| {
                    ContinuousLeafNode::new(
                        s.iter().copied(),
                        [],
                        ContinuousLeafParams {
                            num_spatial_patterns: 16,
                            node: params,
                            seed: 42,
                        },
                    )
                    .unwrap()
                    .into()
                })
                .collect();
            let mut root = InternalNode::new(leaves, params).unwrap();
            root.learn().unwrap();
            black_box(root.num_coincidences())
        });
    });

    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let mut rng = Random::new(3);
    let train: Vec<i32> = (0..1000).map(|_| rng.get_usize(24) as i32).collect();
    let test: Vec<Option<i32>> = (0..1000).map(|_| Some(rng.get_usize(24) as i32)).collect();

    let mut leaf = LeafNode::new(
        train,
        test,
        NodeParams {
            num_groups: 6,
            ..Default::default()
        },
    );
    leaf.learn().unwrap();

    c.bench_function("leaf_predict_stream", |b| {
        b.iter(|| {
            let mut leaf = leaf.clone();
            while leaf.can_predict() {
                black_box(leaf.predict().unwrap());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_agglomeration,
    bench_temporal_pooler_learn,
    bench_hierarchy_learn,
    bench_predict
);
criterion_main!(benches);
