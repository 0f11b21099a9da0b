use crate::network::placement::AgentIdx;
use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
}

/// Round counter plus per-round activation order. Holds nothing else
/// between rounds.
#[derive(Debug, Clone, Default)]
pub struct RoundScheduler {
    round: u64,
}

impl RoundScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        if self.round == 0 { Phase::Idle } else { Phase::Running }
    }

    /// Advances the round counter and returns a fresh shuffle of
    /// `0..num_agents`, each index exactly once.
    pub fn begin_round<R: Rng + ?Sized>(&mut self, num_agents: usize, rng: &mut R) -> Vec<AgentIdx> {
        self.round += 1;
        let mut order: Vec<AgentIdx> = (0..num_agents).collect();
        order.shuffle(rng);
        order
    }
}
