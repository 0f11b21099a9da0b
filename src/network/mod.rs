pub mod node;
pub mod placement;
pub mod topology;

pub use node::{Node, NodeId, NodeState};
pub use placement::Placement;
pub use topology::TopologyConfig;

use crate::error::StateError;
use std::collections::VecDeque;

/// Undirected host graph. Nodes live in an arena indexed by `NodeId`,
/// adjacency lists are kept sorted.
#[derive(Debug, Clone)]
pub struct Network {
    nodes: Vec<Node>,
    adjacency: Vec<Vec<NodeId>>,
}

impl Network {
    pub fn from_adjacency(mut adjacency: Vec<Vec<NodeId>>) -> Self {
        for list in adjacency.iter_mut() {
            list.sort_unstable();
            list.dedup();
        }
        let nodes = (0..adjacency.len()).map(Node::new).collect();
        Self { nodes, adjacency }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node < self.nodes.len()
    }

    /// Neighbors of `node`; empty for an isolated or unknown node.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn state(&self, node: NodeId) -> Result<NodeState, StateError> {
        self.nodes
            .get(node)
            .map(|n| n.state)
            .ok_or(StateError::UnknownNode { node })
    }

    /// Moves `node` to `to` if the state machine allows it, returning the
    /// previous state. Every agent-driven mutation goes through here.
    pub fn transition(&mut self, node: NodeId, to: NodeState) -> Result<NodeState, StateError> {
        let slot = self
            .nodes
            .get_mut(node)
            .ok_or(StateError::UnknownNode { node })?;
        let from = slot.state;
        if !from.can_transition(to) {
            return Err(StateError::IllegalTransition { node, from, to });
        }
        slot.state = to;
        Ok(from)
    }

    /// Overwrites a node's state without consulting the state machine.
    /// Meant for scenario setup by the driver, never for agent rules.
    pub fn set_state(&mut self, node: NodeId, state: NodeState) -> Result<(), StateError> {
        let slot = self
            .nodes
            .get_mut(node)
            .ok_or(StateError::UnknownNode { node })?;
        slot.state = state;
        Ok(())
    }

    pub fn count(&self, state: NodeState) -> usize {
        self.nodes.iter().filter(|n| n.state == state).count()
    }

    pub fn is_connected(&self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        let mut seen = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([0]);
        seen[0] = true;
        let mut visited = 1;

        while let Some(u) = queue.pop_front() {
            for &v in self.neighbors(u) {
                if !seen[v] {
                    seen[v] = true;
                    visited += 1;
                    queue.push_back(v);
                }
            }
        }

        visited == self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> Network {
        let adjacency = (0..n)
            .map(|u| {
                let mut adj = Vec::new();
                if u > 0 {
                    adj.push(u - 1);
                }
                if u + 1 < n {
                    adj.push(u + 1);
                }
                adj
            })
            .collect();
        Network::from_adjacency(adjacency)
    }

    #[test]
    fn starts_all_healthy() {
        let net = path(5);
        assert_eq!(net.count(NodeState::Healthy), 5);
        assert_eq!(net.edge_count(), 4);
        assert!(net.is_connected());
    }

    #[test]
    fn transition_enforces_state_machine() {
        let mut net = path(3);
        assert_eq!(net.transition(1, NodeState::Compromised), Ok(NodeState::Healthy));
        assert_eq!(net.transition(1, NodeState::Quarantined), Ok(NodeState::Compromised));

        let err = net.transition(1, NodeState::Compromised).unwrap_err();
        assert_eq!(
            err,
            StateError::IllegalTransition {
                node: 1,
                from: NodeState::Quarantined,
                to: NodeState::Compromised,
            }
        );
        assert_eq!(net.state(1), Ok(NodeState::Quarantined));
    }

    #[test]
    fn unknown_node_is_reported() {
        let mut net = path(2);
        assert_eq!(net.state(7), Err(StateError::UnknownNode { node: 7 }));
        assert!(net.set_state(7, NodeState::Patched).is_err());
        assert!(net.neighbors(7).is_empty());
    }

    #[test]
    fn isolated_nodes_break_connectivity() {
        let net = Network::from_adjacency(vec![vec![1], vec![0], vec![]]);
        assert!(!net.is_connected());
        assert!(Network::from_adjacency(vec![vec![]]).is_connected());
    }
}
