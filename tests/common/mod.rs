#![allow(dead_code)] // each test binary uses a different subset

use tauscale::TimeTree;

/// Caterpillar (ladder) tree over `heights.len() + 1` leaves: internal
/// node `k` coalesces leaf `k + 1` with the previous internal node at
/// `heights[k]`. Heights must be positive and ascending.
pub fn caterpillar(heights: &[f64]) -> TimeTree {
    let leaf_count = heights.len() + 1;
    let node_count = 2 * leaf_count - 1;
    let mut parents = vec![None; node_count];
    let mut all_heights = vec![0.0; node_count];

    parents[0] = Some(leaf_count);
    parents[1] = Some(leaf_count);
    for k in 2..leaf_count {
        parents[k] = Some(leaf_count + k - 1);
    }
    for (k, &height) in heights.iter().enumerate() {
        all_heights[leaf_count + k] = height;
        if leaf_count + k + 1 < node_count {
            parents[leaf_count + k] = Some(leaf_count + k + 1);
        }
    }

    TimeTree::from_parents(&parents, &all_heights, leaf_count).expect("valid caterpillar tree")
}

/// Balanced four-leaf tree: two cherries at `h_left`/`h_right` under a
/// root at `h_root`.
pub fn balanced_four(h_left: f64, h_right: f64, h_root: f64) -> TimeTree {
    TimeTree::from_parents(
        &[
            Some(4),
            Some(4),
            Some(5),
            Some(5),
            Some(6),
            Some(6),
            None,
        ],
        &[0.0, 0.0, 0.0, 0.0, h_left, h_right, h_root],
        4,
    )
    .expect("valid balanced tree")
}

/// Log-density of a constant-population coalescent prior, up to a
/// constant: total branch length penalized by the population size.
pub fn coalescent_log_prior(tree: &TimeTree, pop_size: f64) -> f64 {
    let mut total = 0.0;
    for id in 0..tree.node_count() {
        if let Some(parent) = tree.parent(id) {
            total += tree.height(parent) - tree.height(id);
        }
    }
    -total / pop_size
}
