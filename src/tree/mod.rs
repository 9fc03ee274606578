//! Arena time-tree
//!
//! A rooted binary ultrametric tree with node heights, shared mutably with
//! the host MCMC engine. Nodes live in a flat arena addressed by stable
//! integer index, leaves first, so operators can scan internal nodes by
//! index range and mutate heights in place with O(1) lookup and no pointer
//! aliasing.
//!
//! The construction validates the time-ordering invariant (every internal
//! node at least as high as both children); operators are responsible for
//! preserving it across height mutations, and [`TimeTree::is_time_ordered`]
//! re-checks it for tests and debug assertions.

mod node;

pub use node::{Node, NodeId};

use thiserror::Error;

/// Errors detected while building or validating a tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    /// Parent and height arrays disagree in length
    #[error("parents has {parents} entries but heights has {heights}")]
    LengthMismatch {
        /// Length of the parent array
        parents: usize,
        /// Length of the height array
        heights: usize,
    },

    /// Parent link points outside the arena
    #[error("node {0} has out-of-range parent {1}")]
    ParentOutOfRange(NodeId, NodeId),

    /// No parentless node, or more than one
    #[error("tree must have exactly one root, found {0}")]
    RootCount(usize),

    /// An internal node without exactly two children, or a leaf with any
    #[error("node {0} has {1} children, expected {2}")]
    NotBinary(NodeId, usize, usize),

    /// Negative height
    #[error("node {0} has negative height {1}")]
    NegativeHeight(NodeId, f64),

    /// Child above parent
    #[error("node {child} (height {child_height}) is above its parent {parent} (height {parent_height})")]
    NotTimeOrdered {
        /// Offending parent
        parent: NodeId,
        /// Height of the parent
        parent_height: f64,
        /// Offending child
        child: NodeId,
        /// Height of the child
        child_height: f64,
    },
}

/// Rooted binary tree with node heights, leaves-first arena layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTree {
    nodes: Vec<Node>,
    leaf_count: usize,
    root: NodeId,
}

impl TimeTree {
    /// Build a tree from parallel parent/height arrays.
    ///
    /// `parents[i]` is the parent of node `i` (`None` for the root),
    /// `heights[i]` its height. Leaves must occupy indices
    /// `0..leaf_count`. Validates binarity, a unique root, non-negative
    /// heights, and the time-ordering invariant.
    pub fn from_parents(
        parents: &[Option<NodeId>],
        heights: &[f64],
        leaf_count: usize,
    ) -> Result<Self, TreeError> {
        if parents.len() != heights.len() {
            return Err(TreeError::LengthMismatch {
                parents: parents.len(),
                heights: heights.len(),
            });
        }
        let node_count = parents.len();

        let mut children: Vec<Vec<NodeId>> = vec![Vec::new(); node_count];
        let mut root = None;
        let mut root_count = 0;
        for (id, &parent) in parents.iter().enumerate() {
            match parent {
                Some(p) if p >= node_count => {
                    return Err(TreeError::ParentOutOfRange(id, p));
                }
                Some(p) => children[p].push(id),
                None => {
                    root = Some(id);
                    root_count += 1;
                }
            }
        }
        let root = match (root, root_count) {
            (Some(r), 1) => r,
            _ => return Err(TreeError::RootCount(root_count)),
        };

        let mut nodes = Vec::with_capacity(node_count);
        for id in 0..node_count {
            if heights[id] < 0.0 {
                return Err(TreeError::NegativeHeight(id, heights[id]));
            }
            let expected = if id < leaf_count { 0 } else { 2 };
            if children[id].len() != expected {
                return Err(TreeError::NotBinary(id, children[id].len(), expected));
            }
            nodes.push(Node {
                height: heights[id],
                parent: parents[id],
                children: if id < leaf_count {
                    None
                } else {
                    Some((children[id][0], children[id][1]))
                },
            });
        }

        let tree = Self {
            nodes,
            leaf_count,
            root,
        };
        tree.check_time_ordered()?;
        Ok(tree)
    }

    /// Number of leaves
    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of internal nodes
    #[inline]
    pub fn internal_count(&self) -> usize {
        self.nodes.len() - self.leaf_count
    }

    /// Total node count
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Root node id
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Check if `id` is a leaf
    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        id < self.leaf_count
    }

    /// Current height of a node
    #[inline]
    pub fn height(&self, id: NodeId) -> f64 {
        self.nodes[id].height
    }

    /// Mutate a node height in place; immediately visible to all readers
    #[inline]
    pub fn set_height(&mut self, id: NodeId, height: f64) {
        self.nodes[id].height = height;
    }

    /// Child pair of an internal node, `None` for leaves
    #[inline]
    pub fn children(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        self.nodes[id].children
    }

    /// Parent link, `None` for the root
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Iterator over internal node ids (leaves-first layout: a contiguous range)
    pub fn internal_ids(&self) -> impl Iterator<Item = NodeId> {
        self.leaf_count..self.nodes.len()
    }

    /// Smaller of the two child heights of an internal node
    pub fn min_child_height(&self, id: NodeId) -> Option<f64> {
        self.nodes[id]
            .children
            .map(|(l, r)| self.nodes[l].height.min(self.nodes[r].height))
    }

    /// Larger of the two child heights of an internal node
    pub fn max_child_height(&self, id: NodeId) -> Option<f64> {
        self.nodes[id]
            .children
            .map(|(l, r)| self.nodes[l].height.max(self.nodes[r].height))
    }

    /// Verify every internal node is at least as high as both children
    pub fn is_time_ordered(&self) -> bool {
        self.check_time_ordered().is_ok()
    }

    fn check_time_ordered(&self) -> Result<(), TreeError> {
        for (id, node) in self.nodes.iter().enumerate() {
            if let Some((l, r)) = node.children {
                for child in [l, r] {
                    if self.nodes[child].height > node.height {
                        return Err(TreeError::NotTimeOrdered {
                            parent: id,
                            parent_height: node.height,
                            child,
                            child_height: self.nodes[child].height,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Copy out all node heights (host-side snapshot before a proposal)
    pub fn snapshot_heights(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.height).collect()
    }

    /// Restore heights from a snapshot (host-side rejection path)
    pub fn restore_heights(&mut self, heights: &[f64]) {
        debug_assert_eq!(heights.len(), self.nodes.len());
        for (node, &height) in self.nodes.iter_mut().zip(heights) {
            node.height = height;
        }
    }
}
