pub mod attacker;
pub mod defender;
pub mod user;

pub use attacker::Attacker;
pub use defender::Defender;
pub use user::User;

use crate::error::StateError;
use crate::interactions::{ActionKind, InteractionLog};
use crate::network::placement::AgentIdx;
use crate::network::{Network, NodeId, NodeState, Placement};
use crate::simulation::SimRng;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Attacker,
    Defender,
    User,
}

impl Role {
    /// Leading letter of generated agent ids (`A0`, `D3`, `U12`).
    pub fn prefix(&self) -> char {
        match self {
            Role::Attacker => 'A',
            Role::Defender => 'D',
            Role::User => 'U',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    Attacker(Attacker),
    Defender(Defender),
    User(User),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    id: AgentId,
    behavior: Behavior,
}

impl Agent {
    pub fn new(id: AgentId, behavior: Behavior) -> Self {
        Self { id, behavior }
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn role(&self) -> Role {
        match self.behavior {
            Behavior::Attacker(_) => Role::Attacker,
            Behavior::Defender(_) => Role::Defender,
            Behavior::User(_) => Role::User,
        }
    }

    /// The phishable side of this agent, if it has one.
    pub fn as_user(&self) -> Option<&User> {
        match &self.behavior {
            Behavior::User(user) => Some(user),
            _ => None,
        }
    }

    /// One activation. `me` is this agent's index in `ctx.agents`.
    pub fn step(&self, me: AgentIdx, ctx: &mut StepContext<'_>) -> Result<(), StateError> {
        match &self.behavior {
            Behavior::Attacker(attacker) => attacker.act(me, ctx),
            Behavior::Defender(defender) => defender.act(me, ctx),
            Behavior::User(user) => user.act(me, ctx),
        }
    }
}

/// Everything an agent may read or touch during its activation.
pub struct StepContext<'a> {
    pub(crate) round: u64,
    pub(crate) network: &'a mut Network,
    pub(crate) placement: &'a mut Placement,
    pub(crate) agents: &'a [Agent],
    pub(crate) rng: &'a mut SimRng,
    pub(crate) log: &'a mut InteractionLog,
}

impl<'a> StepContext<'a> {
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn agent(&self, idx: AgentIdx) -> &'a Agent {
        let agents: &'a [Agent] = self.agents;
        &agents[idx]
    }

    pub fn position(&self, me: AgentIdx) -> Result<NodeId, StateError> {
        self.placement
            .position(me)
            .ok_or_else(|| StateError::Unplaced(self.agents[me].id.to_string()))
    }

    pub fn state(&self, node: NodeId) -> Result<NodeState, StateError> {
        self.network.state(node)
    }

    pub fn transition(&mut self, node: NodeId, to: NodeState) -> Result<NodeState, StateError> {
        self.network.transition(node, to)
    }

    pub fn has_neighbors(&self, node: NodeId) -> bool {
        !self.network.neighbors(node).is_empty()
    }

    /// Agents of `role` currently at `node`, in arrival order.
    pub fn co_located(&self, node: NodeId, role: Role) -> Vec<AgentIdx> {
        self.placement
            .agents_at(node)
            .iter()
            .copied()
            .filter(|&idx| self.agents[idx].role() == role)
            .collect()
    }

    pub fn any_at(&self, node: NodeId, role: Role) -> bool {
        self.placement
            .agents_at(node)
            .iter()
            .any(|&idx| self.agents[idx].role() == role)
    }

    pub fn move_agent(&mut self, me: AgentIdx, node: NodeId) {
        self.placement.move_agent(me, node);
    }

    /// Uniform float draw below `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.r#gen::<f64>() < p
    }

    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        items.choose(&mut *self.rng).copied()
    }

    pub fn pick_neighbor(&mut self, node: NodeId) -> Option<NodeId> {
        self.network.neighbors(node).choose(&mut *self.rng).copied()
    }

    /// Uniform over `node` and its neighbors.
    pub fn pick_self_or_neighbor(&mut self, node: NodeId) -> NodeId {
        let neighbors = self.network.neighbors(node);
        match self.rng.gen_range(0..=neighbors.len()) {
            0 => node,
            i => neighbors[i - 1],
        }
    }

    pub fn record(&mut self, me: AgentIdx, node: NodeId, action: ActionKind, success: bool) {
        let id = &self.agents[me].id;
        debug!(
            "Round {}: {} {} node {} ({})",
            self.round,
            id,
            action,
            node,
            if success { "success" } else { "failed" }
        );
        self.log.record(self.round, id, node, action, success);
    }
}
