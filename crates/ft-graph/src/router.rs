//! Path-planning trait and default breadth-first implementation.
//!
//! The planner is a collaborator of the traffic arbiter, not part of it: it
//! produces the ordered node sequence an agent will try to follow, and the
//! arbiter then gates every lane and intersection along the way.
//!
//! Lanes are unweighted, so the default [`BfsRouter`] returns a path with the
//! fewest lanes.  Ties are broken by ascending `NodeId` (neighbor order in
//! the CSR arrays), which keeps runs deterministic.

use std::collections::VecDeque;

use ft_core::NodeId;

use crate::network::NavGraph;
use crate::GraphError;

// ── Path ──────────────────────────────────────────────────────────────────────

/// An ordered list of nodes from source to destination, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub nodes: Vec<NodeId>,
}

impl Path {
    /// Number of lanes traversed.
    pub fn lane_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable path planner.
///
/// Implementations must be `Send + Sync` so one planner can serve agents
/// driven from several threads.
pub trait Router: Send + Sync {
    /// Compute a path from `from` to `to`.
    ///
    /// `from == to` yields the single-node path; an unreachable destination
    /// yields [`GraphError::NoPath`].
    fn route(&self, graph: &NavGraph, from: NodeId, to: NodeId) -> Result<Path, GraphError>;
}

// ── BfsRouter ─────────────────────────────────────────────────────────────────

/// Fewest-lanes shortest path by breadth-first search.
pub struct BfsRouter;

impl Router for BfsRouter {
    fn route(&self, graph: &NavGraph, from: NodeId, to: NodeId) -> Result<Path, GraphError> {
        for node in [from, to] {
            if !graph.contains(node) {
                return Err(GraphError::NodeNotFound(node));
            }
        }
        if from == to {
            return Ok(Path { nodes: vec![from] });
        }

        // prev[v] = node that discovered v; INVALID for undiscovered.
        let mut prev = vec![NodeId::INVALID; graph.node_count()];
        let mut frontier = VecDeque::from([from]);
        prev[from.index()] = from;

        while let Some(node) = frontier.pop_front() {
            for next in graph.neighbors(node) {
                if prev[next.index()].is_valid() {
                    continue;
                }
                prev[next.index()] = node;
                if next == to {
                    return Ok(reconstruct(&prev, from, to));
                }
                frontier.push_back(next);
            }
        }

        Err(GraphError::NoPath { from, to })
    }
}

fn reconstruct(prev: &[NodeId], from: NodeId, to: NodeId) -> Path {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    Path { nodes }
}
