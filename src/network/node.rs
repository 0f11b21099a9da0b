use serde::{Deserialize, Serialize};
use std::fmt;

pub type NodeId = usize;

/// Health of a simulated host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    Healthy,
    Compromised,
    Patched,
    /// Isolated from the network. Nothing moves a node out of here.
    Quarantined,
}

impl NodeState {
    pub const ALL: [NodeState; 4] = [
        NodeState::Healthy,
        NodeState::Compromised,
        NodeState::Patched,
        NodeState::Quarantined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeState::Healthy => "healthy",
            NodeState::Compromised => "compromised",
            NodeState::Patched => "patched",
            NodeState::Quarantined => "quarantined",
        }
    }

    /// Whether an agent action may move a node from `self` to `to`.
    ///
    /// Staying in the same state is always allowed except for leaving
    /// quarantine, which is never allowed at all.
    pub fn can_transition(&self, to: NodeState) -> bool {
        use NodeState::*;
        if *self == to {
            return true;
        }
        matches!(
            (self, to),
            (Healthy, Compromised)
                | (Patched, Compromised)
                | (Compromised, Patched)
                | (Compromised, Quarantined)
                | (Healthy, Patched)
        )
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::Healthy
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub state: NodeState,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self { id, state: NodeState::Healthy }
    }
}
