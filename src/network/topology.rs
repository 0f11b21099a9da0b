// Connected Watts-Strogatz small world, built from the shared rng

use super::{Network, NodeId};
use crate::error::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

const MAX_TRIES: u32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub num_nodes: usize,
    /// Each node is joined to its `k / 2` nearest ring neighbors on each side.
    pub k: usize,
    /// Per-edge rewiring probability.
    pub p: f64,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            num_nodes: 20,
            k: 4,
            p: 0.15,
        }
    }
}

impl TopologyConfig {
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network, ConfigError> {
        if self.num_nodes == 0 {
            return Err(ConfigError::NoNodes);
        }
        if !(0.0..=1.0).contains(&self.p) {
            return Err(ConfigError::OutOfUnitRange { name: "p", value: self.p });
        }
        if self.k % 2 == 1 && self.k < self.num_nodes {
            warn!("k={} is odd, using k={}", self.k, self.k - 1);
        }

        for attempt in 1..=MAX_TRIES {
            let network = Network::from_adjacency(self.watts_strogatz(rng));
            if network.is_connected() {
                debug!(
                    "Topology built on attempt {}: {} nodes, {} edges",
                    attempt,
                    network.len(),
                    network.edge_count()
                );
                return Ok(network);
            }
        }

        Err(ConfigError::Disconnected {
            nodes: self.num_nodes,
            k: self.k,
            p: self.p,
            tries: MAX_TRIES,
        })
    }

    fn watts_strogatz<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Vec<NodeId>> {
        let n = self.num_nodes;

        if self.k >= n {
            return (0..n).map(|u| (0..n).filter(|&v| v != u).collect()).collect();
        }

        let half = self.k / 2;
        let mut adj: Vec<BTreeSet<NodeId>> = vec![BTreeSet::new(); n];

        for u in 0..n {
            for j in 1..=half {
                let v = (u + j) % n;
                adj[u].insert(v);
                adj[v].insert(u);
            }
        }

        if self.p > 0.0 {
            for j in 1..=half {
                for u in 0..n {
                    if rng.r#gen::<f64>() >= self.p {
                        continue;
                    }
                    let v = (u + j) % n;
                    // already joined to everyone, nowhere to rewire to
                    if adj[u].len() >= n - 1 || !adj[u].contains(&v) {
                        continue;
                    }
                    let mut w = rng.gen_range(0..n);
                    while w == u || adj[u].contains(&w) {
                        w = rng.gen_range(0..n);
                    }
                    adj[u].remove(&v);
                    adj[v].remove(&u);
                    adj[u].insert(w);
                    adj[w].insert(u);
                }
            }
        }

        adj.into_iter().map(|set| set.into_iter().collect()).collect()
    }
}
