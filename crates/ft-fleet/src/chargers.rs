//! Charging-station reservations.

use std::collections::BTreeMap;

use ft_core::{AgentId, NodeId};

/// Agent → the charger it is heading to or docked at.
///
/// A charger appears at most once: [`FleetSim`][crate::FleetSim] only
/// reserves stations nobody else has claimed.  Entries are dropped when the
/// agent finishes charging, is stranded, or is removed.
#[derive(Debug, Default, Clone)]
pub struct ChargerReservations {
    by_agent: BTreeMap<AgentId, NodeId>,
}

impl ChargerReservations {
    pub fn new() -> Self {
        Self::default()
    }

    /// The charger reserved by `agent`, if any.
    #[inline]
    pub fn of(&self, agent: AgentId) -> Option<NodeId> {
        self.by_agent.get(&agent).copied()
    }

    /// The agent that reserved `charger`, if any.
    pub fn holder(&self, charger: NodeId) -> Option<AgentId> {
        self.by_agent
            .iter()
            .find(|(_, c)| **c == charger)
            .map(|(&a, _)| a)
    }

    /// `true` if some agent other than `agent` has reserved `charger`.
    pub fn is_taken_for(&self, charger: NodeId, agent: AgentId) -> bool {
        self.holder(charger).is_some_and(|h| h != agent)
    }

    pub(crate) fn reserve(&mut self, agent: AgentId, charger: NodeId) {
        self.by_agent.insert(agent, charger);
    }

    pub(crate) fn release(&mut self, agent: AgentId) -> Option<NodeId> {
        self.by_agent.remove(&agent)
    }

    pub fn len(&self) -> usize {
        self.by_agent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_agent.is_empty()
    }

    /// `(agent, charger)` pairs in ascending agent order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, NodeId)> + '_ {
        self.by_agent.iter().map(|(&a, &c)| (a, c))
    }
}
