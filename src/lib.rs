pub mod agents;
pub mod error;
pub mod interactions;
pub mod metrics;
pub mod network;
pub mod simulation;

pub use agents::{Agent, AgentId, Role};
pub use error::{ConfigError, SimError, StateError};
pub use interactions::{ActionKind, InteractionLog, InteractionRecord};
pub use metrics::{MetricsCollector, StateCounts};
pub use network::{Network, NodeId, NodeState};
pub use simulation::{SimConfig, Simulation};

pub mod prelude {
    pub use crate::agents::{Agent, AgentId, Behavior, Role};
    pub use crate::error::{ConfigError, SimError, SimResult, StateError};
    pub use crate::interactions::{ActionKind, InteractionLog, InteractionRecord};
    pub use crate::metrics::StateCounts;
    pub use crate::metrics::report::RunReport;
    pub use crate::network::{Network, NodeId, NodeState};
    pub use crate::simulation::{SimConfig, Simulation};
}
