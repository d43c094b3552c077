//! The intersection reservation table and per-node FIFO queues.

use std::collections::{HashMap, VecDeque};

use ft_core::{AgentId, NodeId};

/// Node → holder, plus node → FIFO queue of waiting agents.
///
/// An agent appears at most once in any one node's queue.  Queues are
/// dropped from the map once they empty out.
#[derive(Debug, Default, Clone)]
pub struct IntersectionTable {
    holders: HashMap<NodeId, AgentId>,
    queues:  HashMap<NodeId, VecDeque<AgentId>>,
}

impl IntersectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn holder(&self, node: NodeId) -> Option<AgentId> {
        self.holders.get(&node).copied()
    }

    pub(crate) fn set(&mut self, node: NodeId, agent: AgentId) -> Option<AgentId> {
        self.holders.insert(node, agent)
    }

    pub(crate) fn clear(&mut self, node: NodeId) -> Option<AgentId> {
        self.holders.remove(&node)
    }

    /// Append `agent` to `node`'s queue unless already queued.
    ///
    /// Returns the agent's zero-based position and whether it was newly
    /// inserted.
    pub(crate) fn enqueue(&mut self, node: NodeId, agent: AgentId) -> (usize, bool) {
        let queue = self.queues.entry(node).or_default();
        match queue.iter().position(|&a| a == agent) {
            Some(pos) => (pos, false),
            None => {
                queue.push_back(agent);
                (queue.len() - 1, true)
            }
        }
    }

    /// Pop the head of `node`'s queue.
    pub(crate) fn pop_front(&mut self, node: NodeId) -> Option<AgentId> {
        let queue = self.queues.get_mut(&node)?;
        let head = queue.pop_front();
        if queue.is_empty() {
            self.queues.remove(&node);
        }
        head
    }

    /// Remove `agent` from every queue.  Returns the nodes it was queued at.
    pub(crate) fn dequeue_everywhere(&mut self, agent: AgentId) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        for (&node, queue) in self.queues.iter_mut() {
            if let Some(pos) = queue.iter().position(|&a| a == agent) {
                queue.remove(pos);
                nodes.push(node);
            }
        }
        self.queues.retain(|_, q| !q.is_empty());
        nodes.sort_unstable();
        nodes
    }

    /// Agents queued at `node`, head first.
    pub fn queue(&self, node: NodeId) -> Vec<AgentId> {
        self.queues
            .get(&node)
            .map(|q| q.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_queued(&self, node: NodeId, agent: AgentId) -> bool {
        self.queues.get(&node).is_some_and(|q| q.contains(&agent))
    }

    /// Number of reserved intersections.
    pub fn reserved_count(&self) -> usize {
        self.holders.len()
    }

    /// All `(node, holder)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, AgentId)> + '_ {
        self.holders.iter().map(|(&n, &a)| (n, a))
    }

    /// Intersections reserved by `agent`, sorted.
    pub fn held_by(&self, agent: AgentId) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .holders
            .iter()
            .filter(|(_, h)| **h == agent)
            .map(|(&n, _)| n)
            .collect();
        nodes.sort_unstable();
        nodes
    }
}
