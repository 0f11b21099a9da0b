pub mod config;
pub mod scheduler;

pub use config::SimConfig;
pub use scheduler::{Phase, RoundScheduler};

use crate::agents::{Agent, AgentId, Attacker, Behavior, Defender, Role, StepContext, User};
use crate::error::{ConfigError, SimResult, StateError};
use crate::interactions::logger::dump_interactions;
use crate::interactions::{InteractionLog, InteractionRecord};
use crate::metrics::logger::StateLogger;
use crate::metrics::report::RunReport;
use crate::metrics::{MetricsCollector, StateCounts};
use crate::network::placement::AgentIdx;
use crate::network::{Network, NodeId, NodeState, Placement};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The one generator every draw in a run goes through.
pub type SimRng = ChaCha8Rng;

pub struct Simulation {
    config: SimConfig,
    seed: u64,
    network: Network,
    placement: Placement,
    agents: Vec<Agent>,
    scheduler: RoundScheduler,
    rng: SimRng,
    log: InteractionLog,
    pub metrics: MetricsCollector,
}

impl Simulation {
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = SimRng::seed_from_u64(seed);

        let network = config.topology().build(&mut rng)?;
        let node_ids: Vec<NodeId> = network.node_ids().collect();
        let mut placement = Placement::new(network.len());

        let roster = [
            (Role::Attacker, config.num_attackers),
            (Role::Defender, config.num_defenders),
            (Role::User, config.num_users),
        ];

        let mut agents = Vec::with_capacity(config.num_agents());
        for (role, count) in roster {
            for i in 0..count {
                let behavior = match role {
                    Role::Attacker => Behavior::Attacker(Attacker::new(config.attacker_skill)),
                    Role::Defender => Behavior::Defender(Defender::new(config.defender_diligence)),
                    Role::User => Behavior::User(User::new(config.user_click_prob)),
                };
                let id = AgentId::new(format!("{}{}", role.prefix(), i));
                let node = *node_ids.choose(&mut rng).ok_or(ConfigError::NoNodes)?;

                placement.place(agents.len(), node);
                agents.push(Agent::new(id, behavior));
            }
        }

        info!(
            "Cyber range '{}': {} nodes, {} edges, seed {}",
            config.name,
            network.len(),
            network.edge_count(),
            seed
        );
        info!(
            "Attackers: {}, Defenders: {}, Users: {}",
            config.num_attackers, config.num_defenders, config.num_users
        );

        Ok(Self {
            config,
            seed,
            network,
            placement,
            agents,
            scheduler: RoundScheduler::new(),
            rng,
            log: InteractionLog::new(),
            metrics: MetricsCollector::new(),
        })
    }

    /// Runs one round: every agent acts exactly once in shuffled order.
    /// The end-of-round state counts are saved into `metrics` and returned.
    pub fn step(&mut self) -> SimResult<StateCounts> {
        let order = self.scheduler.begin_round(self.agents.len(), &mut self.rng);
        let round = self.scheduler.round();

        let mut ctx = StepContext {
            round,
            network: &mut self.network,
            placement: &mut self.placement,
            agents: &self.agents,
            rng: &mut self.rng,
            log: &mut self.log,
        };

        for idx in order {
            ctx.agent(idx).step(idx, &mut ctx)?;
        }

        let counts = self.metrics.save_snapshot(&self.network, round);
        debug!(
            "Round {} done: healthy {}, compromised {}, patched {}, quarantined {}",
            round, counts.healthy, counts.compromised, counts.patched, counts.quarantined
        );
        Ok(counts)
    }

    pub fn run(&mut self, rounds: u64) -> SimResult<()> {
        for _ in 0..rounds {
            self.step()?;
        }
        Ok(())
    }

    /// Same as `run`, with a progress bar for interactive use.
    pub fn run_with_progress(&mut self, rounds: u64) -> Result<()> {
        info!("Running {} rounds", rounds);

        let pb = ProgressBar::new(rounds);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.red/yellow} {pos}/{len} rounds {msg}")?
                .progress_chars("█▓░"),
        );

        for _ in 0..rounds {
            let counts = self.step()?;
            pb.inc(1);
            pb.set_message(format!(
                "Compromised: {} | Patched: {} | Quarantined: {}",
                counts.compromised, counts.patched, counts.quarantined
            ));
        }

        pb.finish_with_message("Simulation complete");
        Ok(())
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn round(&self) -> u64 {
        self.scheduler.round()
    }

    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn log(&self) -> &InteractionLog {
        &self.log
    }

    pub fn interactions(&self) -> &[InteractionRecord] {
        self.log.records()
    }

    pub fn state_counts(&self) -> StateCounts {
        StateCounts::from_network(&self.network, self.scheduler.round())
    }

    pub fn node_states(&self) -> Vec<NodeState> {
        self.network.nodes().iter().map(|n| n.state).collect()
    }

    pub fn agent(&self, id: &AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn first_with_role(&self, role: Role) -> Option<&Agent> {
        self.agents.iter().find(|a| a.role() == role)
    }

    pub fn position(&self, id: &AgentId) -> Option<NodeId> {
        self.index_of(id).ok().and_then(|idx| self.placement.position(idx))
    }

    pub fn agents_at(&self, node: NodeId) -> impl Iterator<Item = &Agent> + '_ {
        self.placement.agents_at(node).iter().map(|&idx| &self.agents[idx])
    }

    /// Forces a node's state, bypassing the state machine. For scenario setup.
    pub fn set_node_state(&mut self, node: NodeId, state: NodeState) -> SimResult<()> {
        self.network.set_state(node, state)?;
        Ok(())
    }

    pub fn move_agent(&mut self, id: &AgentId, node: NodeId) -> SimResult<()> {
        let idx = self.index_of(id)?;
        if !self.network.contains(node) {
            return Err(StateError::UnknownNode { node }.into());
        }
        self.placement.move_agent(idx, node);
        Ok(())
    }

    /// Asks a user whether it clicks a phishing lure, drawing from the
    /// shared rng. Nothing is logged.
    pub fn consider_phish(&mut self, id: &AgentId) -> SimResult<bool> {
        let idx = self.index_of(id)?;
        let user = *self.agents[idx]
            .as_user()
            .ok_or_else(|| StateError::NotPhishable(id.to_string()))?;

        let mut ctx = StepContext {
            round: self.scheduler.round(),
            network: &mut self.network,
            placement: &mut self.placement,
            agents: &self.agents,
            rng: &mut self.rng,
            log: &mut self.log,
        };
        Ok(user.consider_phish(idx, &mut ctx)?)
    }

    fn index_of(&self, id: &AgentId) -> Result<AgentIdx, StateError> {
        self.agents
            .iter()
            .position(|a| a.id() == id)
            .ok_or_else(|| StateError::UnknownAgent(id.to_string()))
    }

    /// Writes the interaction CSV, the per-round state CSV and a JSON report.
    /// `interactions_out` overrides the default interaction CSV location.
    pub fn save_results(&self, dir: impl AsRef<Path>, interactions_out: Option<&Path>) -> Result<RunReport> {
        let dir = dir.as_ref();
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        std::fs::create_dir_all(dir)?;

        let csv_path = match interactions_out {
            Some(path) => path.to_path_buf(),
            None => dir.join(format!("{}_{}_interactions.csv", self.config.name, timestamp)),
        };
        dump_interactions(self.log.records(), &csv_path)?;
        info!("Interactions saved to: {}", csv_path.display());

        let states_path: PathBuf = dir.join(format!("{}_{}_states.csv", self.config.name, timestamp));
        let mut logger = StateLogger::new(&states_path)?;
        logger.log_batch(self.metrics.snapshots())?;
        info!("State counts saved to: {}", states_path.display());

        let report = RunReport::from_simulation(self);
        let json_path = dir.join(format!("{}_{}_report.json", self.config.name, timestamp));
        std::fs::write(&json_path, serde_json::to_string_pretty(&report)?)?;
        info!("Report saved to: {}", json_path.display());

        let last = report.final_counts;
        info!(
            "Final: healthy {}, compromised {}, patched {}, quarantined {}",
            last.healthy, last.compromised, last.patched, last.quarantined
        );
        info!("Peak compromised: {}", report.peak_compromised);

        Ok(report)
    }
}
