pub mod logger;

use crate::agents::AgentId;
use crate::network::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Category of a single agent move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    // Reserved, no rule emits it yet
    Probe,
    Exploit,
    Phish,
    Scan,
    Patch,
    Quarantine,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Probe,
        ActionKind::Exploit,
        ActionKind::Phish,
        ActionKind::Scan,
        ActionKind::Patch,
        ActionKind::Quarantine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Probe => "probe",
            ActionKind::Exploit => "exploit",
            ActionKind::Phish => "phish",
            ActionKind::Scan => "scan",
            ActionKind::Patch => "patch",
            ActionKind::Quarantine => "quarantine",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown action: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRecord {
    pub round: u64,
    pub src_agent: AgentId,
    pub dst_node: NodeId,
    pub action: ActionKind,
    pub success: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTally {
    pub attempts: u64,
    pub successes: u64,
}

impl ActionTally {
    pub fn success_rate(&self) -> f64 {
        if self.attempts > 0 {
            self.successes as f64 / self.attempts as f64
        } else {
            0.0
        }
    }
}

/// Append-only, ordered record of every logged agent action.
#[derive(Debug, Clone, Default)]
pub struct InteractionLog {
    records: Vec<InteractionRecord>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        round: u64,
        src_agent: &AgentId,
        dst_node: NodeId,
        action: ActionKind,
        success: bool,
    ) {
        self.records.push(InteractionRecord {
            round,
            src_agent: src_agent.clone(),
            dst_node,
            action,
            success,
        });
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records logged during `round`, in append order.
    pub fn round(&self, round: u64) -> impl Iterator<Item = &InteractionRecord> + '_ {
        self.records.iter().filter(move |r| r.round == round)
    }

    pub fn tally(&self) -> BTreeMap<ActionKind, ActionTally> {
        tally(self.records.iter().map(|r| (r.action, r.success)))
    }
}

pub fn tally(entries: impl IntoIterator<Item = (ActionKind, bool)>) -> BTreeMap<ActionKind, ActionTally> {
    let mut counts: BTreeMap<ActionKind, ActionTally> = BTreeMap::new();
    for (action, success) in entries {
        let entry = counts.entry(action).or_default();
        entry.attempts += 1;
        if success {
            entry.successes += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_append_order_and_duplicates() {
        let a0 = AgentId::new("A0");
        let d1 = AgentId::new("D1");
        let mut log = InteractionLog::new();
        log.record(1, &a0, 3, ActionKind::Exploit, false);
        log.record(1, &d1, 3, ActionKind::Scan, false);
        log.record(1, &d1, 3, ActionKind::Scan, false);
        log.record(2, &a0, 4, ActionKind::Exploit, true);

        assert_eq!(log.len(), 4);
        assert_eq!(log.records()[1], log.records()[2]);
        assert_eq!(log.records()[3].src_agent, a0);
        assert_eq!(log.round(1).count(), 3);

        let tally = log.tally();
        assert_eq!(tally[&ActionKind::Exploit], ActionTally { attempts: 2, successes: 1 });
        assert_eq!(tally[&ActionKind::Scan].attempts, 2);
        assert!(!tally.contains_key(&ActionKind::Phish));
    }

    #[test]
    fn action_names_parse() {
        for kind in ActionKind::ALL {
            assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), kind);
        }
        assert!("exfiltrate".parse::<ActionKind>().is_err());
    }

    #[test]
    fn success_rate_handles_empty() {
        assert_eq!(ActionTally::default().success_rate(), 0.0);
        assert_eq!(ActionTally { attempts: 4, successes: 1 }.success_rate(), 0.25);
    }
}
