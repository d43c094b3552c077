use ft_core::{AgentId, NodeId};
use ft_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("node {0} is not in the navigation graph")]
    UnknownNode(NodeId),

    #[error("robot {0} is not registered")]
    UnknownAgent(AgentId),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("routing error: {0}")]
    Routing(#[from] GraphError),

    #[error("fleet configuration error: {0}")]
    Config(String),
}

pub type FleetResult<T> = Result<T, FleetError>;
