//! Externally visible agent status.
//!
//! The arbiter only ever writes `Waiting` (on denial) and `Moving` (on a
//! grant after waiting); every other transition belongs to the movement
//! controller.

/// What an agent is currently doing.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AgentStatus {
    /// No task assigned (default state).
    #[default]
    Idle,
    /// Following a planned path.
    Moving,
    /// Blocked on a lane or intersection held by another agent.
    Waiting,
    /// Parked at a charger.
    Charging,
    /// Reached the destination of its last task.
    TaskComplete,
}

impl AgentStatus {
    /// `true` while the agent has a path it intends to follow.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, AgentStatus::Moving | AgentStatus::Waiting)
    }

    /// Human-readable label, used in log lines and CSV columns.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Idle         => "idle",
            AgentStatus::Moving       => "moving",
            AgentStatus::Waiting      => "waiting",
            AgentStatus::Charging     => "charging",
            AgentStatus::TaskComplete => "task_complete",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
