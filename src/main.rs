// cyberrange: attackers, defenders and users fighting over a small-world network, one round at a time.

// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use cyberrange::prelude::*;
use cyberrange::interactions::{self, logger::read_interactions};

use clap::{Args, Parser, Subcommand};
use anyhow::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, Level};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single simulation and export its interactions
    Run {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(short, long, default_value_t = 300)]
        steps: u64,
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = "results")]
        results: PathBuf,
    },

    /// Run one configuration over consecutive seeds in parallel
    Batch {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(short, long, default_value_t = 300)]
        steps: u64,
        #[arg(short, long, default_value_t = 8)]
        runs: u64,
        #[arg(long, default_value_t = 0)]
        first_seed: u64,
        #[arg(long, default_value = "results")]
        results: PathBuf,
    },

    /// Print per-action tallies of an exported interaction CSV
    Summarize {
        input: PathBuf,
    },
}

/// Seed used by `run` when neither the flag nor the config file sets one,
/// so single runs replay identically unless asked otherwise.
const DEFAULT_RUN_SEED: u64 = 42;

/// Flags override values loaded from `--config`, which override defaults.
#[derive(Args)]
struct ConfigArgs {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(short = 'n', long)]
    num_nodes: Option<usize>,
    #[arg(short)]
    k: Option<usize>,
    #[arg(short)]
    p: Option<f64>,
    #[arg(long)]
    num_attackers: Option<usize>,
    #[arg(long)]
    num_defenders: Option<usize>,
    #[arg(long)]
    num_users: Option<usize>,
    #[arg(long)]
    attacker_skill: Option<f64>,
    #[arg(long)]
    defender_diligence: Option<f64>,
    #[arg(long)]
    user_click_prob: Option<f64>,
}

impl ConfigArgs {
    fn resolve(&self, fallback_seed: Option<u64>) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config from {}", path.display());
                SimConfig::from_json_file(path)?
            }
            None => SimConfig::default(),
        };

        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        config.seed = self.seed.or(config.seed).or(fallback_seed);
        if let Some(v) = self.num_nodes { config.num_nodes = v; }
        if let Some(v) = self.k { config.k = v; }
        if let Some(v) = self.p { config.p = v; }
        if let Some(v) = self.num_attackers { config.num_attackers = v; }
        if let Some(v) = self.num_defenders { config.num_defenders = v; }
        if let Some(v) = self.num_users { config.num_users = v; }
        if let Some(v) = self.attacker_skill { config.attacker_skill = v; }
        if let Some(v) = self.defender_diligence { config.defender_diligence = v; }
        if let Some(v) = self.user_click_prob { config.user_click_prob = v; }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let program_start = Instant::now();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { config, steps, out, results } => {
            run_single_simulation(config.resolve(Some(DEFAULT_RUN_SEED))?, steps, out, results)?;
        }

        Commands::Batch { config, steps, runs, first_seed, results } => {
            run_batch(config.resolve(None)?, steps, runs, first_seed, results)?;
        }

        Commands::Summarize { input } => {
            summarize(&input)?;
        }
    }

    let total_time = program_start.elapsed();
    info!("Total runtime: {}", format_time(total_time));

    Ok(())
}

fn run_single_simulation(config: SimConfig, steps: u64, out: Option<PathBuf>, results: PathBuf) -> Result<()> {
    info!("Cyber range: Single Run");

    let mut sim = Simulation::new(config)?;
    sim.run_with_progress(steps)?;
    sim.save_results(&results, out.as_deref())?;

    Ok(())
}

fn run_batch(config: SimConfig, steps: u64, runs: u64, first_seed: u64, results: PathBuf) -> Result<()> {
    info!("Cyber range: Batch");
    info!("Seeds: {}..{}", first_seed, first_seed + runs);
    info!("Rounds per run: {}", steps);

    let reports = (first_seed..first_seed + runs)
        .into_par_iter()
        .map(|seed| -> Result<RunReport, SimError> {
            let config = config
                .clone()
                .with_name(format!("{}_{}", config.name, seed))
                .with_seed(seed);
            let mut sim = Simulation::new(config)?;
            sim.run(steps)?;
            Ok(RunReport::from_simulation(&sim))
        })
        .collect::<Result<Vec<_>, SimError>>()?;

    comparison_table(&reports);

    std::fs::create_dir_all(&results)?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let batch_path = results.join(format!("{}_batch_{}.json", config.name, timestamp));
    std::fs::write(&batch_path, serde_json::to_string_pretty(&reports)?)?;
    info!("Batch reports saved to: {}", batch_path.display());

    Ok(())
}

fn summarize(input: &Path) -> Result<()> {
    info!("Summarizing: {}", input.display());

    let rows = read_interactions(input)?;
    if rows.is_empty() {
        info!("No interactions recorded.");
        return Ok(());
    }

    let rounds = rows.iter().map(|r| r.step).max().unwrap_or(0);
    let tally = interactions::tally(rows.iter().map(|r| (r.action, r.success != 0)));

    println!("\n{} interactions over {} rounds\n", rows.len(), rounds);
    println!("{:<12} {:>10} {:>10} {:>9}", "action", "attempts", "successes", "rate");
    for (action, counts) in &tally {
        println!(
            "{:<12} {:>10} {:>10} {:>8.1}%",
            action.as_str(),
            counts.attempts,
            counts.successes,
            counts.success_rate() * 100.0
        );
    }
    println!();

    Ok(())
}

fn format_time(duration: Duration) -> String {
    let secs = duration.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else if secs > 0 {
        format!("{:02}:{:02}", minutes, seconds)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

fn comparison_table(reports: &[RunReport]) {
    println!("\n╔══════════════════════════╦══════════╦═════════════╦═════════╦═════════════╦═══════════╗");
    println!("║ Run                      ║ Healthy  ║ Compromised ║ Patched ║ Quarantined ║ Peak comp ║");
    println!("╠══════════════════════════╬══════════╬═════════════╬═════════╬═════════════╬═══════════╣");

    for report in reports {
        let c = report.final_counts;
        println!(
            "║ {:<24} ║ {:>8} ║ {:>11} ║ {:>7} ║ {:>11} ║ {:>9} ║",
            report.name, c.healthy, c.compromised, c.patched, c.quarantined, report.peak_compromised,
        );
    }

    println!("╚══════════════════════════╩══════════╩═════════════╩═════════╩═════════════╩═══════════╝\n");

    let n = reports.len().max(1) as f64;
    let avg_share = reports.iter().map(|r| r.compromised_share()).sum::<f64>() / n;
    println!("Mean compromised share at end: {:.1}%", avg_share * 100.0);

    if let Some(worst) = reports.iter().max_by_key(|r| r.peak_compromised) {
        println!("Worst peak: {} ({} nodes)", worst.name, worst.peak_compromised);
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_config(args: &[&str]) -> SimConfig {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Run { config, .. } => config.resolve(Some(DEFAULT_RUN_SEED)).unwrap(),
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn run_seed_defaults_to_42() {
        assert_eq!(run_config(&["cyberrange", "run"]).seed, Some(42));
        assert_eq!(run_config(&["cyberrange", "run", "--seed", "7"]).seed, Some(7));
    }

    #[test]
    fn flags_override_defaults() {
        let config = run_config(&["cyberrange", "run", "-n", "12", "--user-click-prob", "0.9"]);
        assert_eq!(config.num_nodes, 12);
        assert_eq!(config.user_click_prob, 0.9);
        assert_eq!(config.k, SimConfig::default().k);
    }
}
