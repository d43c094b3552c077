//! Canonical lane identifier.
//!
//! A lane is an undirected, mutually exclusive resource between two nodes.
//! Travel direction does not matter: `(A, B)` and `(B, A)` name the same lane,
//! so the key stores the pair sorted.

use std::fmt;

use crate::NodeId;

/// An unordered node pair, stored with `lo <= hi`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneKey {
    pub lo: NodeId,
    pub hi: NodeId,
}

impl LaneKey {
    /// Canonicalize `(u, v)` by sorting the pair.
    #[inline]
    pub fn new(u: NodeId, v: NodeId) -> Self {
        if u <= v {
            Self { lo: u, hi: v }
        } else {
            Self { lo: v, hi: u }
        }
    }

    /// `true` if `node` is one of the two endpoints.
    #[inline]
    pub fn touches(self, node: NodeId) -> bool {
        self.lo == node || self.hi == node
    }

    /// The endpoint opposite `node`, or `None` if `node` is not an endpoint.
    pub fn other(self, node: NodeId) -> Option<NodeId> {
        if node == self.lo {
            Some(self.hi)
        } else if node == self.hi {
            Some(self.lo)
        } else {
            None
        }
    }
}

impl From<(NodeId, NodeId)> for LaneKey {
    #[inline]
    fn from((u, v): (NodeId, NodeId)) -> Self {
        LaneKey::new(u, v)
    }
}

impl fmt::Display for LaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lo, self.hi)
    }
}
