//! Arena node record
//!
//! Nodes are addressed by stable integer index ([`NodeId`]); leaves occupy
//! indices `0..leaf_count`, internal nodes `leaf_count..node_count`. A record
//! carries a height (time before present, leaves at 0) plus parent/child
//! links into the arena.

use std::fmt;

/// Stable index of a node in the tree arena.
pub type NodeId = usize;

/// A single node record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Time before present; leaves sit at 0, the root at the maximum
    pub height: f64,

    /// Parent link (`None` only for the root)
    pub parent: Option<NodeId>,

    /// Child links; `None` for leaves, both present for internal nodes
    pub children: Option<(NodeId, NodeId)>,
}

impl Node {
    /// Create a leaf at the given height (usually 0)
    pub fn leaf(height: f64) -> Self {
        Self {
            height,
            parent: None,
            children: None,
        }
    }

    /// Create an internal node over two children
    pub fn internal(height: f64, left: NodeId, right: NodeId) -> Self {
        Self {
            height,
            parent: None,
            children: Some((left, right)),
        }
    }

    /// Check if leaf (no children)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.children {
            None => write!(f, "leaf@{}", self.height),
            Some((l, r)) => write!(f, "({}, {})@{}", l, r, self.height),
        }
    }
}
