use super::{Role, StepContext};
use crate::error::StateError;
use crate::interactions::ActionKind;
use crate::network::NodeState;
use crate::network::placement::AgentIdx;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Chance of phishing instead of exploiting when a user is present.
pub const PHISH_PREFERENCE: f64 = 0.5;
/// Exploit success multiplier against a patched host.
pub const PATCHED_EXPLOIT_FACTOR: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attacker {
    pub skill: f64,
}

impl Attacker {
    pub fn new(skill: f64) -> Self {
        Self { skill }
    }

    pub fn exploit_probability(&self, target: NodeState) -> f64 {
        match target {
            NodeState::Healthy => self.skill,
            NodeState::Patched => self.skill * PATCHED_EXPLOIT_FACTOR,
            NodeState::Compromised | NodeState::Quarantined => 0.0,
        }
    }

    pub(crate) fn act(&self, me: AgentIdx, ctx: &mut StepContext<'_>) -> Result<(), StateError> {
        let here = ctx.position(me)?;

        let Some(target) = ctx.pick_neighbor(here) else {
            debug!("{} has no neighbors at node {}", ctx.agent(me).id(), here);
            return Ok(());
        };

        let state = ctx.state(target)?;
        if state == NodeState::Quarantined {
            debug!("{} skips quarantined node {}", ctx.agent(me).id(), target);
            return Ok(());
        }

        let users = ctx.co_located(target, Role::User);
        let action = if !users.is_empty() && ctx.chance(PHISH_PREFERENCE) {
            ActionKind::Phish
        } else {
            ActionKind::Exploit
        };

        let success = match action {
            ActionKind::Exploit => match state {
                NodeState::Healthy | NodeState::Patched => {
                    ctx.chance(self.exploit_probability(state))
                }
                _ => false,
            },
            _ => match ctx.pick(&users) {
                Some(victim) => match ctx.agent(victim).as_user() {
                    Some(user) => user.consider_phish(victim, ctx)?,
                    None => false,
                },
                None => false,
            },
        };

        if success {
            ctx.transition(target, NodeState::Compromised)?;
        }
        ctx.record(me, target, action, success);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patched_hosts_are_harder() {
        let attacker = Attacker::new(0.5);
        assert_eq!(attacker.exploit_probability(NodeState::Healthy), 0.5);
        assert!((attacker.exploit_probability(NodeState::Patched) - 0.2).abs() < 1e-12);
        assert_eq!(attacker.exploit_probability(NodeState::Compromised), 0.0);
        assert_eq!(attacker.exploit_probability(NodeState::Quarantined), 0.0);
    }
}
