//! The `AgentRegistry` trait.

use ft_core::{AgentId, AgentStatus, NodeId};

/// Read/flip access to agent state, as needed by the traffic arbiter.
///
/// Every query returns `None` for an agent the registry does not know (never
/// spawned, or removed).  The arbiter treats an unknown agent as "nothing to
/// notify" and carries on.
pub trait AgentRegistry {
    /// `true` if `agent` is currently registered.
    fn contains(&self, agent: AgentId) -> bool;

    fn status(&self, agent: AgentId) -> Option<AgentStatus>;

    /// Overwrite the agent's status.  Returns `false` for an unknown agent.
    fn set_status(&mut self, agent: AgentId, status: AgentStatus) -> bool;

    /// The node the agent is at.
    fn location(&self, agent: AgentId) -> Option<NodeId>;

    /// The node the agent intends to move to next, if any.
    fn next_node(&self, agent: AgentId) -> Option<NodeId>;

    /// All registered agents, in registry order.
    fn agent_ids(&self) -> Vec<AgentId>;
}
