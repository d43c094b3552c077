//! Structured traffic events.
//!
//! Every state transition in the arbiter produces exactly one
//! [`TrafficEvent`].  Each event is written as one `tracing` line (`info` for
//! successful transitions, `warn` for conflicts) and, when enabled, buffered
//! for the caller to drain.

use std::fmt;

use ft_core::{AgentId, LaneKey, NodeId};

/// Log severity of an event.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Info,
    Warn,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARNING",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One arbitration outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TrafficEvent {
    /// `agent` became the holder of `lane`.
    LaneOccupied { agent: AgentId, lane: LaneKey },

    /// `agent` tried to occupy `lane` held by `holder`.
    LaneConflict { agent: AgentId, lane: LaneKey, holder: AgentId },

    /// `agent` released `lane`.
    LaneFreed { agent: AgentId, lane: LaneKey },

    /// `agent` tried to free `lane` it does not hold.
    LaneNotHeld { agent: AgentId, lane: LaneKey, holder: Option<AgentId> },

    /// `agent` was denied `lane` and now waits at node `at`.
    LaneWaiting { agent: AgentId, lane: LaneKey, at: NodeId },

    /// Waiting `agent` was admitted to `lane` by a wake scan.
    LaneGranted { agent: AgentId, lane: LaneKey },

    /// `agent` reserved the free intersection `node`.
    IntersectionReserved { agent: AgentId, node: NodeId },

    /// `agent` joined the queue for `node` at zero-based `position`.
    IntersectionQueued { agent: AgentId, node: NodeId, position: usize },

    /// `agent` released intersection `node`.
    IntersectionReleased { agent: AgentId, node: NodeId },

    /// `agent` tried to release intersection `node` it does not hold.
    IntersectionNotHeld { agent: AgentId, node: NodeId, holder: Option<AgentId> },

    /// Queued `agent` was admitted to `node` by a queue advance.
    IntersectionGranted { agent: AgentId, node: NodeId },
}

impl TrafficEvent {
    /// Conflicts with another agent are warnings; everything else is info.
    ///
    /// Releasing a resource nobody holds is not a conflict, so it stays at
    /// info.
    pub fn severity(&self) -> Severity {
        match self {
            TrafficEvent::LaneConflict { .. } => Severity::Warn,
            TrafficEvent::LaneNotHeld { holder: Some(_), .. } => Severity::Warn,
            TrafficEvent::IntersectionNotHeld { holder: Some(_), .. } => Severity::Warn,
            _ => Severity::Info,
        }
    }

    /// Stable snake_case label, used as a CSV column value.
    pub fn kind(&self) -> &'static str {
        match self {
            TrafficEvent::LaneOccupied { .. }         => "lane_occupied",
            TrafficEvent::LaneConflict { .. }         => "lane_conflict",
            TrafficEvent::LaneFreed { .. }            => "lane_freed",
            TrafficEvent::LaneNotHeld { .. }          => "lane_not_held",
            TrafficEvent::LaneWaiting { .. }          => "lane_waiting",
            TrafficEvent::LaneGranted { .. }          => "lane_granted",
            TrafficEvent::IntersectionReserved { .. } => "intersection_reserved",
            TrafficEvent::IntersectionQueued { .. }   => "intersection_queued",
            TrafficEvent::IntersectionReleased { .. } => "intersection_released",
            TrafficEvent::IntersectionNotHeld { .. }  => "intersection_not_held",
            TrafficEvent::IntersectionGranted { .. }  => "intersection_granted",
        }
    }

    /// The agent the event is about.
    pub fn agent(&self) -> AgentId {
        match *self {
            TrafficEvent::LaneOccupied { agent, .. }
            | TrafficEvent::LaneConflict { agent, .. }
            | TrafficEvent::LaneFreed { agent, .. }
            | TrafficEvent::LaneNotHeld { agent, .. }
            | TrafficEvent::LaneWaiting { agent, .. }
            | TrafficEvent::LaneGranted { agent, .. }
            | TrafficEvent::IntersectionReserved { agent, .. }
            | TrafficEvent::IntersectionQueued { agent, .. }
            | TrafficEvent::IntersectionReleased { agent, .. }
            | TrafficEvent::IntersectionNotHeld { agent, .. }
            | TrafficEvent::IntersectionGranted { agent, .. } => agent,
        }
    }

    /// The lane or intersection the event is about, formatted for output.
    pub fn resource(&self) -> String {
        match self {
            TrafficEvent::LaneOccupied { lane, .. }
            | TrafficEvent::LaneConflict { lane, .. }
            | TrafficEvent::LaneFreed { lane, .. }
            | TrafficEvent::LaneNotHeld { lane, .. }
            | TrafficEvent::LaneWaiting { lane, .. }
            | TrafficEvent::LaneGranted { lane, .. } => format!("lane {lane}"),
            TrafficEvent::IntersectionReserved { node, .. }
            | TrafficEvent::IntersectionQueued { node, .. }
            | TrafficEvent::IntersectionReleased { node, .. }
            | TrafficEvent::IntersectionNotHeld { node, .. }
            | TrafficEvent::IntersectionGranted { node, .. } => format!("intersection {node}"),
        }
    }

    /// Write this event as one log line.
    pub fn emit(&self) {
        let agent = self.agent();
        let resource = self.resource();
        match self.severity() {
            Severity::Info => tracing::info!(%agent, %resource, kind = self.kind(), "{}", self),
            Severity::Warn => tracing::warn!(%agent, %resource, kind = self.kind(), "{}", self),
        }
    }
}

impl fmt::Display for TrafficEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficEvent::LaneOccupied { agent, lane } => {
                write!(f, "Robot {agent} occupied lane {lane}.")
            }
            TrafficEvent::LaneConflict { agent, lane, holder } => write!(
                f,
                "Robot {agent} tried to occupy already occupied lane {lane} by robot {holder}."
            ),
            TrafficEvent::LaneFreed { agent, lane } => {
                write!(f, "Robot {agent} freed lane {lane}.")
            }
            TrafficEvent::LaneNotHeld { agent, lane, holder: Some(holder) } => write!(
                f,
                "Robot {agent} tried to free lane {lane} occupied by robot {holder}."
            ),
            TrafficEvent::LaneNotHeld { agent, lane, holder: None } => write!(
                f,
                "Robot {agent} tried to free lane {lane}, which is not occupied."
            ),
            TrafficEvent::LaneWaiting { agent, lane, at } => write!(
                f,
                "Robot {agent} requesting occupied lane {lane}, now waiting at {at}."
            ),
            TrafficEvent::LaneGranted { agent, lane } => write!(
                f,
                "Robot {agent} granted access to lane {lane} after waiting."
            ),
            TrafficEvent::IntersectionReserved { agent, node } => {
                write!(f, "Robot {agent} reserved intersection {node}.")
            }
            TrafficEvent::IntersectionQueued { agent, node, position } => write!(
                f,
                "Robot {agent} waiting for intersection {node} (queue position {position})."
            ),
            TrafficEvent::IntersectionReleased { agent, node } => {
                write!(f, "Robot {agent} released intersection {node}.")
            }
            TrafficEvent::IntersectionNotHeld { agent, node, holder: Some(holder) } => write!(
                f,
                "Robot {agent} tried to release intersection {node} reserved by robot {holder}."
            ),
            TrafficEvent::IntersectionNotHeld { agent, node, holder: None } => write!(
                f,
                "Robot {agent} tried to release intersection {node}, which is not reserved."
            ),
            TrafficEvent::IntersectionGranted { agent, node } => write!(
                f,
                "Intersection {node} granted to robot {agent} from queue."
            ),
        }
    }
}
