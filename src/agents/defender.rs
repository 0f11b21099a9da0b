use super::StepContext;
use crate::error::StateError;
use crate::interactions::ActionKind;
use crate::network::NodeState;
use crate::network::placement::AgentIdx;
use serde::{Deserialize, Serialize};

/// Share of detections remediated by patching; the rest are quarantined.
pub const PATCH_SHARE: f64 = 0.7;
/// Chance of patching a healthy host that was looked at.
pub const PROACTIVE_PATCH: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Defender {
    pub diligence: f64,
}

impl Defender {
    pub fn new(diligence: f64) -> Self {
        Self { diligence }
    }

    /// Inspects the current node or a neighbor. Always logs exactly once:
    /// a remediation, a proactive patch, or a fruitless scan.
    pub(crate) fn act(&self, me: AgentIdx, ctx: &mut StepContext<'_>) -> Result<(), StateError> {
        let here = ctx.position(me)?;
        let target = ctx.pick_self_or_neighbor(here);
        let state = ctx.state(target)?;

        let detected = state == NodeState::Compromised && ctx.chance(self.diligence);

        if detected {
            if ctx.chance(PATCH_SHARE) {
                ctx.transition(target, NodeState::Patched)?;
                ctx.record(me, target, ActionKind::Patch, true);
            } else {
                ctx.transition(target, NodeState::Quarantined)?;
                ctx.record(me, target, ActionKind::Quarantine, true);
            }
        } else if state == NodeState::Healthy && ctx.chance(PROACTIVE_PATCH) {
            ctx.transition(target, NodeState::Patched)?;
            ctx.record(me, target, ActionKind::Patch, true);
        } else {
            ctx.record(me, target, ActionKind::Scan, false);
        }

        Ok(())
    }
}
