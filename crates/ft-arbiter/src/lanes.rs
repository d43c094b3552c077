//! The lane occupancy table.

use std::collections::HashMap;

use ft_core::{AgentId, LaneKey};

/// Lane key → holder.  Absence of an entry means the lane is free.
///
/// The table is a plain map with no policy: contention checks and logging
/// live in [`TrafficArbiter`][crate::TrafficArbiter].
#[derive(Debug, Default, Clone)]
pub struct LaneTable {
    holders: HashMap<LaneKey, AgentId>,
}

impl LaneTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn holder(&self, lane: LaneKey) -> Option<AgentId> {
        self.holders.get(&lane).copied()
    }

    /// `true` if nobody holds `lane`, or `agent` itself does.
    #[inline]
    pub fn is_free_for(&self, lane: LaneKey, agent: AgentId) -> bool {
        self.holder(lane).is_none_or(|h| h == agent)
    }

    /// Record `agent` as holder, returning the previous holder.
    pub(crate) fn set(&mut self, lane: LaneKey, agent: AgentId) -> Option<AgentId> {
        self.holders.insert(lane, agent)
    }

    pub(crate) fn clear(&mut self, lane: LaneKey) -> Option<AgentId> {
        self.holders.remove(&lane)
    }

    /// Number of occupied lanes.
    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    /// All `(lane, holder)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (LaneKey, AgentId)> + '_ {
        self.holders.iter().map(|(&k, &a)| (k, a))
    }

    /// Lanes held by `agent`, sorted.
    pub fn held_by(&self, agent: AgentId) -> Vec<LaneKey> {
        let mut lanes: Vec<LaneKey> = self
            .holders
            .iter()
            .filter(|(_, h)| **h == agent)
            .map(|(&k, _)| k)
            .collect();
        lanes.sort_unstable();
        lanes
    }
}
