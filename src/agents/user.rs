use super::{Role, StepContext};
use crate::error::StateError;
use crate::network::placement::AgentIdx;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MOVE_PROBABILITY: f64 = 0.1;
/// Click probability multiplier while a defender shares the node.
pub const DEFENDER_DAMPING: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub click_prob: f64,
}

impl User {
    pub fn new(click_prob: f64) -> Self {
        Self { click_prob }
    }

    pub fn effective_click_prob(&self, defender_present: bool) -> f64 {
        if defender_present {
            self.click_prob * DEFENDER_DAMPING
        } else {
            self.click_prob
        }
    }

    /// Whether this user falls for a phishing attempt. The attacker logs
    /// the outcome, nothing is recorded here.
    pub fn consider_phish(&self, me: AgentIdx, ctx: &mut StepContext<'_>) -> Result<bool, StateError> {
        let here = ctx.position(me)?;
        let guarded = ctx.any_at(here, Role::Defender);
        Ok(ctx.chance(self.effective_click_prob(guarded)))
    }

    /// Occasionally wanders to a neighboring node. Never logs.
    pub(crate) fn act(&self, me: AgentIdx, ctx: &mut StepContext<'_>) -> Result<(), StateError> {
        let here = ctx.position(me)?;
        if !ctx.has_neighbors(here) || !ctx.chance(MOVE_PROBABILITY) {
            return Ok(());
        }

        if let Some(to) = ctx.pick_neighbor(here) {
            debug!("{} moves {} -> {}", ctx.agent(me).id(), here, to);
            ctx.move_agent(me, to);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defenders_halve_click_probability() {
        let user = User::new(0.3);
        assert_eq!(user.effective_click_prob(false), 0.3);
        assert_eq!(user.effective_click_prob(true), 0.15);
        assert_eq!(User::new(0.0).effective_click_prob(true), 0.0);
    }
}
