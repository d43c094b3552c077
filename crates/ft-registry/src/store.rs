//! `FleetRegistry` — Structure-of-Arrays agent storage.
//!
//! Every `Vec` field has exactly `count()` elements; the `AgentId` value is the
//! index into all of them:
//!
//! ```ignore
//! let here = registry.location[agent.index()];
//! ```
//!
//! Agents are never physically removed.  Retiring an agent clears its
//! `active` flag so ids stay stable for the lifetime of the registry.

use ft_core::{AgentId, AgentStatus, NodeId};

use crate::AgentRegistry;

/// In-memory fleet state, one slot per spawned agent.
#[derive(Debug, Default, Clone)]
pub struct FleetRegistry {
    /// `false` once the agent has been retired.
    pub active: Vec<bool>,

    /// Current externally visible status.
    pub status: Vec<AgentStatus>,

    /// Node the agent is standing at.
    pub location: Vec<NodeId>,

    /// Next node on the planned path; `NodeId::INVALID` when there is none.
    pub next_node: Vec<NodeId>,

    /// Final node of the current task; `NodeId::INVALID` when idle.
    pub destination: Vec<NodeId>,

    /// Battery level in percent.
    pub battery: Vec<f32>,

    /// Planned path including the start node.  Empty when idle.
    pub paths: Vec<Vec<NodeId>>,

    /// Index into `paths[agent]` of `next_node`.
    pub path_index: Vec<usize>,
}

impl FleetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(agents: usize) -> Self {
        Self {
            active:      Vec::with_capacity(agents),
            status:      Vec::with_capacity(agents),
            location:    Vec::with_capacity(agents),
            next_node:   Vec::with_capacity(agents),
            destination: Vec::with_capacity(agents),
            battery:     Vec::with_capacity(agents),
            paths:       Vec::with_capacity(agents),
            path_index:  Vec::with_capacity(agents),
        }
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Add an idle agent standing at `node` and return its id (sequential
    /// from 0).
    pub fn spawn(&mut self, node: NodeId, battery: f32) -> AgentId {
        let id = AgentId(self.status.len() as u32);
        self.active.push(true);
        self.status.push(AgentStatus::Idle);
        self.location.push(node);
        self.next_node.push(NodeId::INVALID);
        self.destination.push(NodeId::INVALID);
        self.battery.push(battery);
        self.paths.push(Vec::new());
        self.path_index.push(0);
        tracing::info!(agent = %id, node = %node, battery, "robot spawned");
        id
    }

    /// Retire `agent`: it keeps its slot but is no longer registered.
    ///
    /// Returns `false` if the agent is unknown or already retired.
    pub fn retire(&mut self, agent: AgentId) -> bool {
        if !self.contains(agent) {
            return false;
        }
        let i = agent.index();
        self.active[i] = false;
        self.status[i] = AgentStatus::Idle;
        self.clear_path(agent);
        tracing::info!(agent = %agent, "robot removed");
        true
    }

    /// Number of slots, including retired agents.
    #[inline]
    pub fn count(&self) -> usize {
        self.status.len()
    }

    /// Number of registered (non-retired) agents.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Iterator over registered `AgentId`s in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter(|(_, a)| **a)
            .map(|(i, _)| AgentId(i as u32))
    }

    // ── Paths ─────────────────────────────────────────────────────────────

    /// Install a planned path (start node first) for `agent`.
    ///
    /// - Path of two or more nodes: `destination` is the last node and
    ///   `next_node` the second.
    /// - Single-node path at the agent's own location: the agent is already
    ///   there; status becomes `TaskComplete`.
    /// - Anything else clears the task; a `Moving` or `Waiting` agent reverts
    ///   to `Idle`.
    ///
    /// Status is otherwise left for the caller to set.
    pub fn set_path(&mut self, agent: AgentId, path: Vec<NodeId>) {
        if !self.contains(agent) {
            return;
        }
        let i = agent.index();
        match path.len() {
            n if n > 1 => {
                self.destination[i] = path[n - 1];
                self.next_node[i]   = path[1];
                self.path_index[i]  = 1;
                self.paths[i]       = path;
            }
            1 if path[0] == self.location[i] => {
                self.destination[i] = path[0];
                self.next_node[i]   = NodeId::INVALID;
                self.path_index[i]  = 0;
                self.paths[i]       = path;
                self.status[i]      = AgentStatus::TaskComplete;
            }
            _ => {
                self.clear_path(agent);
                if self.status[i].is_active() {
                    self.status[i] = AgentStatus::Idle;
                }
            }
        }
    }

    /// Drop the agent's path, next node and destination.
    pub fn clear_path(&mut self, agent: AgentId) {
        let i = agent.index();
        if i >= self.count() {
            return;
        }
        self.paths[i].clear();
        self.path_index[i]  = 0;
        self.next_node[i]   = NodeId::INVALID;
        self.destination[i] = NodeId::INVALID;
    }

    /// Step `agent` onto its `next_node` and advance along the path.
    ///
    /// Returns the node the agent left, or `None` if it had no next node.
    pub fn advance(&mut self, agent: AgentId) -> Option<NodeId> {
        if !self.contains(agent) {
            return None;
        }
        let i = agent.index();
        let next = self.next_node[i];
        if !next.is_valid() {
            return None;
        }
        let previous = self.location[i];
        self.location[i] = next;
        self.path_index[i] += 1;
        self.next_node[i] = self.paths[i]
            .get(self.path_index[i])
            .copied()
            .unwrap_or(NodeId::INVALID);
        Some(previous)
    }

    /// Path nodes not yet reached, starting with `next_node`.
    pub fn remaining_path(&self, agent: AgentId) -> &[NodeId] {
        let i = agent.index();
        if i >= self.count() {
            return &[];
        }
        self.paths[i].get(self.path_index[i]..).unwrap_or(&[])
    }

    // ── Battery ───────────────────────────────────────────────────────────

    pub fn battery(&self, agent: AgentId) -> Option<f32> {
        self.contains(agent).then(|| self.battery[agent.index()])
    }

    /// Subtract `amount` from the battery, clamped at zero.  Returns the new
    /// level.
    pub fn drain_battery(&mut self, agent: AgentId, amount: f32) -> f32 {
        let level = &mut self.battery[agent.index()];
        *level = (*level - amount).max(0.0);
        *level
    }

    /// Add `amount` to the battery, capped at 100.
    pub fn charge(&mut self, agent: AgentId, amount: f32) -> f32 {
        let level = &mut self.battery[agent.index()];
        *level = (*level + amount).min(100.0);
        *level
    }
}

impl AgentRegistry for FleetRegistry {
    #[inline]
    fn contains(&self, agent: AgentId) -> bool {
        self.active.get(agent.index()).copied().unwrap_or(false)
    }

    fn status(&self, agent: AgentId) -> Option<AgentStatus> {
        self.contains(agent).then(|| self.status[agent.index()])
    }

    fn set_status(&mut self, agent: AgentId, status: AgentStatus) -> bool {
        if !self.contains(agent) {
            return false;
        }
        let slot = &mut self.status[agent.index()];
        if *slot != status {
            tracing::debug!(agent = %agent, from = %*slot, to = %status, "status updated");
            *slot = status;
        }
        true
    }

    fn location(&self, agent: AgentId) -> Option<NodeId> {
        self.contains(agent).then(|| self.location[agent.index()])
    }

    fn next_node(&self, agent: AgentId) -> Option<NodeId> {
        if !self.contains(agent) {
            return None;
        }
        let next = self.next_node[agent.index()];
        next.is_valid().then_some(next)
    }

    fn agent_ids(&self) -> Vec<AgentId> {
        self.ids().collect()
    }
}
