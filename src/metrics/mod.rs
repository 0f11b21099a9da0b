pub mod logger;
pub mod report;

use crate::network::{Network, NodeState};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Nodes per state at the end of a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub round: u64,
    pub healthy: usize,
    pub compromised: usize,
    pub patched: usize,
    pub quarantined: usize,
}

impl StateCounts {
    pub fn from_network(network: &Network, round: u64) -> Self {
        let mut counts = Self { round, ..Self::default() };
        for node in network.nodes() {
            match node.state {
                NodeState::Healthy => counts.healthy += 1,
                NodeState::Compromised => counts.compromised += 1,
                NodeState::Patched => counts.patched += 1,
                NodeState::Quarantined => counts.quarantined += 1,
            }
        }
        counts
    }

    pub fn get(&self, state: NodeState) -> usize {
        match state {
            NodeState::Healthy => self.healthy,
            NodeState::Compromised => self.compromised,
            NodeState::Patched => self.patched,
            NodeState::Quarantined => self.quarantined,
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.compromised + self.patched + self.quarantined
    }
}

/// Per-round history of state counts, filled by the driver after each round.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    snapshots: Vec<StateCounts>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_snapshot(&mut self, network: &Network, round: u64) -> StateCounts {
        let snapshot = StateCounts::from_network(network, round);
        if snapshot.total() != network.len() {
            warn!(
                "Round {}: state counts add up to {} but network has {} nodes",
                round,
                snapshot.total(),
                network.len()
            );
        }
        self.snapshots.push(snapshot);
        snapshot
    }

    pub fn snapshots(&self) -> &[StateCounts] {
        &self.snapshots
    }

    pub fn last(&self) -> Option<&StateCounts> {
        self.snapshots.last()
    }

    pub fn peak_compromised(&self) -> usize {
        self.snapshots.iter().map(|s| s.compromised).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_partition_the_network() {
        let mut net = Network::from_adjacency(vec![vec![1], vec![0, 2], vec![1]]);
        net.set_state(0, NodeState::Compromised).unwrap();
        net.set_state(2, NodeState::Quarantined).unwrap();

        let counts = StateCounts::from_network(&net, 7);
        assert_eq!(counts, StateCounts {
            round: 7,
            healthy: 1,
            compromised: 1,
            patched: 0,
            quarantined: 1,
        });
        assert_eq!(counts.total(), net.len());
        for state in NodeState::ALL {
            assert_eq!(counts.get(state), net.count(state));
        }
    }

    #[test]
    fn collector_tracks_peak() {
        let mut net = Network::from_adjacency(vec![vec![1], vec![0]]);
        let mut metrics = MetricsCollector::new();
        metrics.save_snapshot(&net, 1);
        net.set_state(0, NodeState::Compromised).unwrap();
        net.set_state(1, NodeState::Compromised).unwrap();
        metrics.save_snapshot(&net, 2);
        net.set_state(1, NodeState::Patched).unwrap();
        metrics.save_snapshot(&net, 3);

        assert_eq!(metrics.snapshots().len(), 3);
        assert_eq!(metrics.peak_compromised(), 2);
        assert_eq!(metrics.last().map(|s| s.patched), Some(1));
    }
}
