use crate::network::{NodeId, NodeState};
use thiserror::Error;

/// Setup failures. Any of these aborts simulation construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("network must have at least one node")]
    NoNodes,

    #[error("{name} must be within [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },

    #[error("could not build a connected topology with n={nodes}, k={k}, p={p} after {tries} tries")]
    Disconnected { nodes: usize, k: usize, p: f64, tries: u32 },
}

/// Internal invariant violations. Seeing one of these means a rule is broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("node {node} does not exist")]
    UnknownNode { node: NodeId },

    #[error("illegal transition {from} -> {to} on node {node}")]
    IllegalTransition { node: NodeId, from: NodeState, to: NodeState },

    #[error("agent {0} is not placed on any node")]
    Unplaced(String),

    #[error("no agent with id {0}")]
    UnknownAgent(String),

    #[error("agent {0} cannot be phished")]
    NotPhishable(String),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    State(#[from] StateError),
}

pub type SimResult<T> = std::result::Result<T, SimError>;
