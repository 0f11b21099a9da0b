use crate::error::ConfigError;
use crate::network::TopologyConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub name: String,
    pub num_nodes: usize,
    pub k: usize,
    pub p: f64,
    pub num_attackers: usize,
    pub num_defenders: usize,
    pub num_users: usize,
    pub attacker_skill: f64,
    pub defender_diligence: f64,
    pub user_click_prob: f64,
    /// `None` picks a random seed at construction; it is logged either way.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            name: "cyber_range".to_string(),
            num_nodes: 20,
            k: 4,
            p: 0.15,
            num_attackers: 2,
            num_defenders: 3,
            num_users: 10,
            attacker_skill: 0.55,
            defender_diligence: 0.65,
            user_click_prob: 0.25,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_topology(mut self, num_nodes: usize, k: usize, p: f64) -> Self {
        self.num_nodes = num_nodes;
        self.k = k;
        self.p = p;
        self
    }

    pub fn with_population(mut self, attackers: usize, defenders: usize, users: usize) -> Self {
        self.num_attackers = attackers;
        self.num_defenders = defenders;
        self.num_users = users;
        self
    }

    pub fn with_attacker_skill(mut self, skill: f64) -> Self {
        self.attacker_skill = skill;
        self
    }

    pub fn with_defender_diligence(mut self, diligence: f64) -> Self {
        self.defender_diligence = diligence;
        self
    }

    pub fn with_user_click_prob(mut self, click_prob: f64) -> Self {
        self.user_click_prob = click_prob;
        self
    }

    pub fn topology(&self) -> TopologyConfig {
        TopologyConfig {
            num_nodes: self.num_nodes,
            k: self.k,
            p: self.p,
        }
    }

    pub fn num_agents(&self) -> usize {
        self.num_attackers + self.num_defenders + self.num_users
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_nodes == 0 {
            return Err(ConfigError::NoNodes);
        }

        let unit = [
            ("p", self.p),
            ("attacker_skill", self.attacker_skill),
            ("defender_diligence", self.defender_diligence),
            ("user_click_prob", self.user_click_prob),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.num_agents(), 15);
    }

    #[test]
    fn rejects_zero_nodes_and_bad_traits() {
        let config = SimConfig::default().with_topology(0, 4, 0.1);
        assert_eq!(config.validate(), Err(ConfigError::NoNodes));

        let config = SimConfig::default().with_defender_diligence(1.2);
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfUnitRange { name: "defender_diligence", value: 1.2 })
        );

        let config = SimConfig::default().with_user_click_prob(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_takes_defaults() {
        let config: SimConfig = serde_json::from_str(r#"{"num_nodes": 8, "seed": 11}"#).unwrap();
        assert_eq!(config.num_nodes, 8);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.num_users, 10);
        assert_eq!(config.name, "cyber_range");
    }
}
