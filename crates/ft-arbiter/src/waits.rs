//! Lane-wait registry and the advisory intention record.
//!
//! # Iteration order
//!
//! The lane-wait registry iterates in **insertion order**, and that order is
//! what the lane wake scan uses to pick the next agent.  Replacing an agent's
//! wait keeps the agent's original slot, so re-admission is not FIFO by the
//! time of the most recent request.
//!
//! Waits are held in a `Vec` scanned linearly; its length is bounded by the
//! number of blocked agents.

use std::collections::HashMap;

use ft_core::{AgentId, LaneKey, NodeId};

// ── LaneWait ──────────────────────────────────────────────────────────────────

/// The lane an agent is blocked on: from `current` towards `next`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneWait {
    pub current: NodeId,
    pub next: NodeId,
}

impl LaneWait {
    #[inline]
    pub fn lane(self) -> LaneKey {
        LaneKey::new(self.current, self.next)
    }
}

// ── LaneWaitRegistry ──────────────────────────────────────────────────────────

/// Agent → outstanding lane wait, iterated in insertion order.
#[derive(Debug, Default, Clone)]
pub struct LaneWaitRegistry {
    entries: Vec<(AgentId, LaneWait)>,
}

impl LaneWaitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, agent: AgentId) -> Option<usize> {
        self.entries.iter().position(|(a, _)| *a == agent)
    }

    pub fn get(&self, agent: AgentId) -> Option<LaneWait> {
        self.position(agent).map(|i| self.entries[i].1)
    }

    /// Record or replace `agent`'s wait.  A replacement keeps the agent's
    /// slot.  Returns the superseded wait, if any.
    pub fn insert(&mut self, agent: AgentId, wait: LaneWait) -> Option<LaneWait> {
        match self.position(agent) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, wait)),
            None => {
                self.entries.push((agent, wait));
                None
            }
        }
    }

    pub fn remove(&mut self, agent: AgentId) -> Option<LaneWait> {
        self.position(agent).map(|i| self.entries.remove(i).1)
    }

    /// Remove `agent`'s wait only if it is for `lane`.
    pub fn remove_if_lane(&mut self, agent: AgentId, lane: LaneKey) -> bool {
        match self.position(agent) {
            Some(i) if self.entries[i].1.lane() == lane => {
                self.entries.remove(i);
                true
            }
            _ => false,
        }
    }

    /// Agents waiting on `lane`, in registry order.
    pub fn waiting_on(&self, lane: LaneKey) -> Vec<AgentId> {
        self.entries
            .iter()
            .filter(|(_, w)| w.lane() == lane)
            .map(|(a, _)| *a)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, LaneWait)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Intentions ────────────────────────────────────────────────────────────────

/// An agent's declared next move.  Recorded for observability; arbitration
/// never reads it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intention {
    pub current: NodeId,
    pub next: NodeId,
}

/// Agent → latest declared intention.
#[derive(Debug, Default, Clone)]
pub struct Intentions {
    inner: HashMap<AgentId, Intention>,
}

impl Intentions {
    pub fn register(&mut self, agent: AgentId, current: NodeId, next: NodeId) {
        self.inner.insert(agent, Intention { current, next });
    }

    pub fn clear(&mut self, agent: AgentId) -> Option<Intention> {
        self.inner.remove(&agent)
    }

    pub fn get(&self, agent: AgentId) -> Option<Intention> {
        self.inner.get(&agent).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
