//! Plain data row types written by output backends.

use ft_arbiter::TrafficEvent;
use ft_core::Tick;

/// One arbitration event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficEventRow {
    pub tick:     u64,
    /// `INFO` or `WARNING`.
    pub severity: &'static str,
    /// snake_case event label, e.g. `lane_conflict`.
    pub kind:     &'static str,
    pub agent_id: u32,
    /// `lane (a, b)` or `intersection n`.
    pub resource: String,
}

impl TrafficEventRow {
    pub fn from_event(tick: Tick, event: &TrafficEvent) -> Self {
        Self {
            tick:     tick.0,
            severity: event.severity().as_str(),
            kind:     event.kind(),
            agent_id: event.agent().0,
            resource: event.resource(),
        }
    }
}

/// A snapshot of one agent at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id:  u32,
    pub tick:      u64,
    pub status:    &'static str,
    pub location:  u32,
    /// `u32::MAX` when the agent has nowhere to go.
    pub next_node: u32,
    pub battery:   f32,
}

/// Summary statistics for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:         u64,
    pub elapsed_ms:   u64,
    pub moved_agents: u64,
    pub events:       u64,
}
