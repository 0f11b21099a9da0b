use super::StateCounts;
use crate::interactions::{ActionKind, ActionTally};
use crate::simulation::Simulation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub name: String,
    pub seed: u64,
    pub rounds: u64,
    pub num_nodes: usize,
    pub num_agents: usize,
    pub final_counts: StateCounts,
    pub peak_compromised: usize,
    pub interactions: usize,
    pub actions: BTreeMap<ActionKind, ActionTally>,
}

impl RunReport {
    pub fn from_simulation(sim: &Simulation) -> Self {
        let final_counts = sim.state_counts();
        Self {
            name: sim.config().name.clone(),
            seed: sim.seed(),
            rounds: sim.round(),
            num_nodes: sim.network().len(),
            num_agents: sim.agents().len(),
            final_counts,
            peak_compromised: sim.metrics.peak_compromised().max(final_counts.compromised),
            interactions: sim.log().len(),
            actions: sim.log().tally(),
        }
    }

    pub fn compromised_share(&self) -> f64 {
        self.final_counts.compromised as f64 / self.num_nodes as f64
    }
}
