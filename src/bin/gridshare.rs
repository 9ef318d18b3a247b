//! gridshare CLI
//!
//! Inspect experiment configurations and run reward sharing over recorded or
//! synthetic per-intersection rewards.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use gridshare::agent::reward_sum;
use gridshare::shaper::StepInputs;
use gridshare::{
    generate_run_id, EnvKind, EpisodeAccumulator, ExperimentConfig, GridTopology, Orientations,
    RewardMap, RewardShaper,
};

#[derive(Parser)]
#[command(name = "gridshare")]
#[command(version, about = "Reward sharing for multi-agent traffic-light grids", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved experiment configuration as JSON
    Config {
        #[command(flatten)]
        experiment: ExperimentArgs,
    },

    /// Replay recorded raw rewards (JSON lines) and write adjusted rewards
    Adjust {
        #[command(flatten)]
        experiment: ExperimentArgs,

        /// JSON-lines file of raw reward records ("-" for stdin)
        #[arg(long)]
        rewards: PathBuf,
    },

    /// Run the shaper on seeded random rewards
    Demo {
        #[command(flatten)]
        experiment: ExperimentArgs,

        /// Number of episodes
        #[arg(long, default_value = "3")]
        episodes: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

#[derive(Args)]
struct ExperimentArgs {
    /// Experiment configuration file (JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rows of intersections
    #[arg(long)]
    num_rows: Option<usize>,

    /// Columns of intersections
    #[arg(long)]
    num_cols: Option<usize>,

    /// Vehicle inflow per outer edge (veh/hour)
    #[arg(long)]
    inflow_rate: Option<u32>,

    /// Environment variant
    #[arg(long, value_enum)]
    env: Option<EnvKind>,

    /// Number of nearest neighbours for colight sharing
    #[arg(long)]
    k_nearest: Option<usize>,

    /// Softmax temperature for colight sharing
    #[arg(long)]
    temp: Option<f64>,

    /// Neighbour weight for reward sharing
    #[arg(long)]
    neighbor_weight: Option<f64>,
}

impl ExperimentArgs {
    fn resolve(&self) -> Result<ExperimentConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("opening config {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => ExperimentConfig::default(),
        };
        if let Some(rows) = self.num_rows {
            cfg.rows = rows;
        }
        if let Some(cols) = self.num_cols {
            cfg.cols = cols;
        }
        if let Some(inflow) = self.inflow_rate {
            cfg.inflow_rate = inflow;
        }
        if let Some(env) = self.env {
            cfg.env = env;
        }
        if let Some(k) = self.k_nearest {
            cfg.sharing.k_nearest_neighbor = k;
        }
        if let Some(temp) = self.temp {
            cfg.sharing.temperature_factor = temp;
        }
        if let Some(weight) = self.neighbor_weight {
            cfg.sharing.neighbor_weight = weight;
        }
        cfg.validate().context("invalid experiment configuration")?;
        Ok(cfg)
    }
}

/// One timestep of recorded raw rewards.
#[derive(Deserialize)]
struct RewardRecord {
    episode: u64,
    rewards: RewardMap,
    #[serde(default)]
    orientations: Option<Vec<i64>>,
}

/// Adjusted rewards written for each input record.
#[derive(Serialize)]
struct AdjustedRecord<'a> {
    episode: u64,
    step: u64,
    rewards: &'a RewardMap,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { experiment } => {
            let cfg = experiment.resolve()?;
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
        Commands::Adjust {
            experiment,
            rewards,
        } => {
            let cfg = experiment.resolve()?;
            adjust(&cfg, &rewards)?;
        }
        Commands::Demo {
            experiment,
            episodes,
            seed,
        } => {
            let cfg = experiment.resolve()?;
            demo(&cfg, episodes, seed)?;
        }
    }

    Ok(())
}

fn build_shaper(cfg: &ExperimentConfig) -> Result<RewardShaper> {
    let run_id = generate_run_id();
    tracing::info!(
        run_id = %run_id,
        exp_tag = %cfg.exp_tag(),
        env = %cfg.env,
        "Starting run"
    );
    let shaper = RewardShaper::new(cfg.topology()?, &cfg.sharing_config())?;
    Ok(shaper)
}

fn open_records(path: &Path) -> Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file =
        File::open(path).with_context(|| format!("opening rewards {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn adjust(cfg: &ExperimentConfig, path: &Path) -> Result<()> {
    let shaper = build_shaper(cfg)?;
    let reader = open_records(path)?;
    let mut out = BufWriter::new(io::stdout().lock());

    let mut accumulator = EpisodeAccumulator::new();
    let mut current_episode: Option<u64> = None;
    let mut step = 0u64;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: RewardRecord = serde_json::from_str(&line)
            .with_context(|| format!("parsing reward record on line {}", line_no + 1))?;

        if current_episode != Some(record.episode) {
            if let Some(episode) = current_episode {
                log_episode_end(episode, &accumulator);
            }
            accumulator.reset();
            current_episode = Some(record.episode);
            step = 0;
        }

        let orientations = record
            .orientations
            .as_deref()
            .map(|flags| Orientations::from_flags(shaper.topology(), flags))
            .transpose()
            .with_context(|| format!("orientation flags on line {}", line_no + 1))?;
        let adjusted = shaper
            .compute_reward_with(
                &record.rewards,
                StepInputs {
                    orientations: orientations.as_ref(),
                    observations: None,
                },
                &mut accumulator,
            )
            .with_context(|| format!("adjusting rewards on line {}", line_no + 1))?;

        serde_json::to_writer(
            &mut out,
            &AdjustedRecord {
                episode: record.episode,
                step,
                rewards: &adjusted,
            },
        )?;
        writeln!(out)?;
        step += 1;
    }

    if let Some(episode) = current_episode {
        log_episode_end(episode, &accumulator);
    }
    out.flush()?;
    Ok(())
}

fn demo(cfg: &ExperimentConfig, episodes: usize, seed: u64) -> Result<()> {
    let shaper = build_shaper(cfg)?;
    let topology = *shaper.topology();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut accumulator = EpisodeAccumulator::new();

    // Orientation is a property of the network, fixed for the whole run.
    let orientations = random_orientations(&topology, &mut rng)?;
    tracing::info!(flags = ?orientations.flags(), "Orientation flags");

    println!("Strategy: {}", shaper.strategy_name());
    for episode in 0..episodes {
        accumulator.reset();
        let mut adjusted_total = 0.0;

        for _ in 0..cfg.horizon {
            let raw: RewardMap = topology
                .agents()
                .map(|agent| (agent, -rng.gen::<f64>()))
                .collect();
            let adjusted = shaper.compute_reward_with(
                &raw,
                StepInputs {
                    orientations: Some(&orientations),
                    observations: None,
                },
                &mut accumulator,
            )?;
            adjusted_total += reward_sum(&adjusted);
        }

        log_episode_end(episode as u64, &accumulator);
        println!(
            "episode {:>3}  raw reward {:>10.3}  adjusted reward {:>10.3}",
            episode,
            accumulator.total(),
            adjusted_total
        );
    }
    Ok(())
}

fn random_orientations(topology: &GridTopology, rng: &mut StdRng) -> Result<Orientations> {
    let flags: Vec<i64> = topology
        .agents()
        .map(|_| i64::from(rng.gen_bool(0.5)))
        .collect();
    Ok(Orientations::from_flags(topology, &flags)?)
}

fn log_episode_end(episode: u64, accumulator: &EpisodeAccumulator) {
    tracing::info!(
        episode,
        steps = accumulator.steps(),
        raw_reward = accumulator.total(),
        "Episode finished"
    );
}
