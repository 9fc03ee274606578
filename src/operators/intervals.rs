//! Coalescent-interval partition
//!
//! Splits the sorted sequence {0} ∪ {internal node heights} into half-open
//! intervals and maps each interval to the set of nodes whose height must
//! shift by the same offset when that interval's duration changes.
//!
//! Boundary markers are node ids, not cached heights: interval durations are
//! always read from the live tree, so the partition stays valid across
//! height-only proposals. Topology changes invalidate it; rebuilding then is
//! the host's responsibility.

use std::collections::BTreeSet;

use crate::operators::OperatorError;
use crate::tree::{NodeId, TimeTree};

/// Interval boundaries and per-interval node sets for a fixed topology.
///
/// Interval `i` spans from the height of boundary marker `i` to the height
/// of marker `i + 1`. Marker 0 is a leaf, the synthetic height-0 "present"
/// boundary; the remaining markers are the internal nodes in ascending
/// height order (ties broken by ascending node id). The node sets are
/// monotonic: the set for interval `i` is a superset of the set for
/// interval `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalPartition {
    /// Boundary markers, `interval_count + 1` of them
    boundaries: Vec<NodeId>,

    /// One node set per interval, lowest interval first
    tau_map: Vec<BTreeSet<NodeId>>,
}

impl IntervalPartition {
    /// Partition the tree's current heights into coalescent intervals.
    ///
    /// Two passes: first mark each interval with the nodes whose branch
    /// (min child height up to own height) fully spans it, then union each
    /// interval's set into the one below so that every node above an
    /// interval moves with it.
    pub fn build(tree: &TimeTree) -> Result<Self, OperatorError> {
        let internal = tree.internal_count();
        if internal < 2 {
            return Err(OperatorError::TreeTooSmall(internal));
        }

        let mut boundaries: Vec<NodeId> = tree.internal_ids().collect();
        // Leaf 0 stands in for the height-0 present boundary
        boundaries.push(0);
        boundaries.sort_by(|&a, &b| tree.height(a).total_cmp(&tree.height(b)).then(a.cmp(&b)));

        let mut tau_map: Vec<BTreeSet<NodeId>> = vec![BTreeSet::new(); internal];
        for node in tree.internal_ids() {
            let Some(min_child) = tree.min_child_height(node) else {
                continue;
            };
            let height = tree.height(node);
            for i in 1..boundaries.len() {
                let start = tree.height(boundaries[i - 1]);
                let end = tree.height(boundaries[i]);
                if height >= end && start >= min_child {
                    tau_map[i - 1].insert(node);
                }
            }
        }

        // Monotonic superset invariant: everything above an interval moves too
        for i in (1..internal).rev() {
            let (below, above) = tau_map.split_at_mut(i);
            below[i - 1].extend(above[0].iter().copied());
        }

        Ok(Self {
            boundaries,
            tau_map,
        })
    }

    /// Number of intervals (equals the tree's internal node count)
    #[inline]
    pub fn interval_count(&self) -> usize {
        self.tau_map.len()
    }

    /// Boundary markers in ascending height order
    pub fn boundaries(&self) -> &[NodeId] {
        &self.boundaries
    }

    /// Nodes that shift together when interval `i` is rescaled
    pub fn node_set(&self, i: usize) -> &BTreeSet<NodeId> {
        &self.tau_map[i]
    }

    /// Current duration of interval `i`, read from the live tree heights
    #[inline]
    pub fn duration(&self, i: usize, tree: &TimeTree) -> f64 {
        tree.height(self.boundaries[i + 1]) - tree.height(self.boundaries[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Caterpillar over 4 leaves: internals 4, 5, 6(root) at heights 1, 2, 3
    fn caterpillar() -> TimeTree {
        TimeTree::from_parents(
            &[
                Some(4),
                Some(4),
                Some(5),
                Some(6),
                Some(5),
                Some(6),
                None,
            ],
            &[0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0],
            4,
        )
        .unwrap()
    }

    #[test]
    fn test_scenario_three_internals() {
        let tree = caterpillar();
        let partition = IntervalPartition::build(&tree).unwrap();

        assert_eq!(partition.interval_count(), 3);
        let heights: Vec<f64> = partition
            .boundaries()
            .iter()
            .map(|&id| tree.height(id))
            .collect();
        assert_eq!(heights, vec![0.0, 1.0, 2.0, 3.0]);

        // Every branch spans the lowest interval; only the root spans the top
        let all: BTreeSet<NodeId> = [4, 5, 6].into_iter().collect();
        assert_eq!(partition.node_set(0), &all);
        assert_eq!(
            partition.node_set(2),
            &[6].into_iter().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_node_sets_are_monotonic() {
        let tree = caterpillar();
        let partition = IntervalPartition::build(&tree).unwrap();
        for i in 0..partition.interval_count() - 1 {
            assert!(
                partition.node_set(i).is_superset(partition.node_set(i + 1)),
                "interval {} set is not a superset of interval {}",
                i,
                i + 1
            );
        }
    }

    #[test]
    fn test_durations_read_live_heights() {
        let mut tree = caterpillar();
        let partition = IntervalPartition::build(&tree).unwrap();
        assert_eq!(partition.duration(1, &tree), 1.0);

        // Shifting node 5 changes the durations around it without a rebuild
        tree.set_height(5, 2.5);
        assert_eq!(partition.duration(1, &tree), 1.5);
        assert_eq!(partition.duration(2, &tree), 0.5);
    }

    #[test]
    fn test_minimal_tree_two_internals() {
        // ((A,B),C): 2 internal nodes, 2 intervals, top set is root only
        let tree = TimeTree::from_parents(
            &[Some(3), Some(3), Some(4), Some(4), None],
            &[0.0, 0.0, 0.0, 1.0, 2.0],
            3,
        )
        .unwrap();
        let partition = IntervalPartition::build(&tree).unwrap();

        assert_eq!(partition.interval_count(), 2);
        assert_eq!(partition.node_set(1).len(), 1);
        assert!(partition.node_set(1).contains(&tree.root()));
    }

    #[test]
    fn test_single_internal_node_rejected() {
        let tree =
            TimeTree::from_parents(&[Some(2), Some(2), None], &[0.0, 0.0, 1.0], 2).unwrap();
        assert_eq!(
            IntervalPartition::build(&tree),
            Err(OperatorError::TreeTooSmall(1))
        );
    }

    #[test]
    fn test_equal_heights_collapse_to_empty_interval() {
        // Balanced tree with both cherries at the same height
        let tree = TimeTree::from_parents(
            &[
                Some(4),
                Some(4),
                Some(5),
                Some(5),
                Some(6),
                Some(6),
                None,
            ],
            &[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 2.0],
            4,
        )
        .unwrap();
        let partition = IntervalPartition::build(&tree).unwrap();

        assert_eq!(partition.interval_count(), 3);
        // Tie broken by node id: 4 before 5
        assert_eq!(partition.boundaries(), &[0, 4, 5, 6]);
        // The zero-length interval between the tied heights
        assert_eq!(partition.duration(1, &tree), 0.0);
    }
}
