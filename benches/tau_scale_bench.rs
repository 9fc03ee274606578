//! Partition construction and proposal throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tauscale::{IntervalPartition, TauScaleConfig, TauScaleOperator, TimeTree};

/// Caterpillar tree with `leaves - 1` evenly spaced coalescent events.
fn caterpillar(leaves: usize) -> TimeTree {
    let node_count = 2 * leaves - 1;
    let mut parents = vec![None; node_count];
    let mut heights = vec![0.0; node_count];

    parents[0] = Some(leaves);
    parents[1] = Some(leaves);
    for k in 2..leaves {
        parents[k] = Some(leaves + k - 1);
    }
    for k in 0..leaves - 1 {
        heights[leaves + k] = (k + 1) as f64 * 0.1;
        if leaves + k + 1 < node_count {
            parents[leaves + k] = Some(leaves + k + 1);
        }
    }
    TimeTree::from_parents(&parents, &heights, leaves).expect("valid tree")
}

fn bench_partition_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_build");
    for leaves in [16, 64, 256] {
        let tree = caterpillar(leaves);
        group.bench_with_input(BenchmarkId::from_parameter(leaves), &tree, |b, tree| {
            b.iter(|| IntervalPartition::build(black_box(tree)).unwrap());
        });
    }
    group.finish();
}

fn bench_propose(c: &mut Criterion) {
    let mut group = c.benchmark_group("propose");
    for leaves in [16, 64, 256] {
        let tree = caterpillar(leaves);
        let mut op = TauScaleOperator::new(
            TauScaleConfig {
                scale_factor: 0.5,
                ..TauScaleConfig::default()
            },
            &tree,
        )
        .unwrap();
        let snapshot = tree.snapshot_heights();

        group.bench_function(BenchmarkId::from_parameter(leaves), |b| {
            let mut tree = tree.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            b.iter(|| {
                let ratio = op.propose(black_box(&mut tree), &mut rng);
                tree.restore_heights(&snapshot);
                ratio
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_partition_build, bench_propose);
criterion_main!(benches);
