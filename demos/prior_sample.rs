//! Sample node heights from a coalescent prior with the tau-scale operator.
//!
//! A minimal Metropolis loop standing in for the host engine: propose,
//! accept or restore, report the decision back for coercion. Run with
//! `RUST_LOG=tauscale=debug` to watch the scale factor adapt.

use anyhow::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tauscale::{TauScaleConfig, TauScaleOperator, TimeTree};

const ITERATIONS: usize = 20_000;
const POP_SIZE: f64 = 1.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Ladder tree over 8 leaves, coalescent events at 0.25, 0.5, ...
    let leaves = 8;
    let node_count = 2 * leaves - 1;
    let mut parents = vec![None; node_count];
    let mut heights = vec![0.0; node_count];
    parents[0] = Some(leaves);
    parents[1] = Some(leaves);
    for k in 2..leaves {
        parents[k] = Some(leaves + k - 1);
    }
    for k in 0..leaves - 1 {
        heights[leaves + k] = (k + 1) as f64 * 0.25;
        if leaves + k + 1 < node_count {
            parents[leaves + k] = Some(leaves + k + 1);
        }
    }
    let mut tree = TimeTree::from_parents(&parents, &heights, leaves)?;

    let mut op = TauScaleOperator::new(
        TauScaleConfig {
            scale_factor: 0.5,
            ..TauScaleConfig::default()
        },
        &tree,
    )?;
    let mut rng = ChaCha8Rng::seed_from_u64(2016);

    let mut current = log_prior(&tree);
    let mut root_height_sum = 0.0;
    for _ in 0..ITERATIONS {
        let snapshot = tree.snapshot_heights();
        let log_hastings = op.propose(&mut tree, &mut rng);
        let log_alpha = if log_hastings == f64::NEG_INFINITY {
            f64::NEG_INFINITY
        } else {
            log_prior(&tree) - current + log_hastings
        };

        if log_alpha >= 0.0 || rng.gen::<f64>() < log_alpha.exp() {
            current = log_prior(&tree);
            op.accepted();
        } else {
            tree.restore_heights(&snapshot);
            op.rejected();
        }
        op.optimize(log_alpha.min(0.0));
        root_height_sum += tree.height(tree.root());
    }

    let (accepted, rejected) = op.decision_counts();
    println!("iterations      : {}", ITERATIONS);
    println!(
        "acceptance rate : {:.3}",
        accepted as f64 / (accepted + rejected) as f64
    );
    println!("tuned factor    : {:.6}", op.scale_factor());
    println!(
        "mean root height: {:.4}",
        root_height_sum / ITERATIONS as f64
    );
    match op.performance_suggestion() {
        Some(hint) => println!("suggestion      : {}", hint),
        None => println!("suggestion      : acceptance rate looks healthy"),
    }

    Ok(())
}

/// Constant-population coalescent prior, up to a constant.
fn log_prior(tree: &TimeTree) -> f64 {
    let mut total_branch_length = 0.0;
    for id in 0..tree.node_count() {
        if let Some(parent) = tree.parent(id) {
            total_branch_length += tree.height(parent) - tree.height(id);
        }
    }
    -total_branch_length / POP_SIZE
}
