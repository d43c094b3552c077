//! Graph-subsystem error type.

use thiserror::Error;

use ft_core::NodeId;

/// Errors produced by `ft-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("graph file has no usable level (expected one of {expected:?})")]
    MissingLevel { expected: &'static [&'static str] },

    #[error("lane {index} references vertex {vertex}, but only {count} vertices exist")]
    DanglingLane { index: usize, vertex: u32, count: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
