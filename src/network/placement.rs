use super::NodeId;

/// Index of an agent in the simulation's agent list.
pub type AgentIdx = usize;

/// Many-agents-per-node lookup, kept in both directions.
///
/// Occupant lists preserve arrival order so that choosing among
/// co-located agents is reproducible for a given seed.
#[derive(Debug, Clone, Default)]
pub struct Placement {
    positions: Vec<Option<NodeId>>,
    occupants: Vec<Vec<AgentIdx>>,
}

impl Placement {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            positions: Vec::new(),
            occupants: vec![Vec::new(); num_nodes],
        }
    }

    /// Puts an agent on a node for the first time. Placing an agent that
    /// is already on the grid behaves like `move_agent`.
    pub fn place(&mut self, agent: AgentIdx, node: NodeId) {
        if agent >= self.positions.len() {
            self.positions.resize(agent + 1, None);
        }
        if self.positions[agent].is_some() {
            self.move_agent(agent, node);
            return;
        }
        self.positions[agent] = Some(node);
        self.occupants[node].push(agent);
    }

    pub fn move_agent(&mut self, agent: AgentIdx, node: NodeId) {
        match self.position(agent) {
            Some(current) if current == node => {}
            Some(current) => {
                self.occupants[current].retain(|&a| a != agent);
                self.occupants[node].push(agent);
                self.positions[agent] = Some(node);
            }
            None => self.place(agent, node),
        }
    }

    pub fn position(&self, agent: AgentIdx) -> Option<NodeId> {
        self.positions.get(agent).copied().flatten()
    }

    pub fn agents_at(&self, node: NodeId) -> &[AgentIdx] {
        self.occupants.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}
