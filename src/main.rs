use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::Level;

use sctm::memory::scoring;
use sctm::memory::RetentionConfig;
use sctm::sim::{Simulation, SimulationConfig};

#[derive(Parser)]
#[command(name = "sctm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scored retention buffer simulator", long_about = None)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    /// TOML file with buffer settings
    #[arg(short, long, global = true, env = "SCTM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted simulation and print the final buffer state
    Simulate {
        /// Number of simulation rounds
        #[arg(short, long, default_value = "40")]
        steps: u32,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the decay curve for a single item
    Curve {
        #[arg(long, default_value = "0.8")]
        confidence: f64,

        #[arg(short, long, default_value = "1")]
        usage: u32,

        /// Defaults to the configured decay rate
        #[arg(short = 'l', long)]
        decay_rate: Option<f64>,

        #[arg(long, default_value_t = scoring::DEFAULT_CURVE_SAMPLES)]
        samples: usize,

        #[arg(long, default_value_t = scoring::DEFAULT_CURVE_STEP)]
        step: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    sctm::telemetry::init_tracing(cli.json, level);

    let buffer_config = match &cli.config {
        Some(path) => RetentionConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SimulationConfig::default().buffer,
    };

    match cli.command {
        Commands::Simulate { steps, seed } => cmd_simulate(buffer_config, steps, seed),
        Commands::Curve {
            confidence,
            usage,
            decay_rate,
            samples,
            step,
        } => cmd_curve(
            confidence,
            usage,
            decay_rate.unwrap_or(buffer_config.decay_rate),
            samples,
            step,
        ),
    }
}

fn cmd_simulate(buffer: RetentionConfig, steps: u32, seed: Option<u64>) -> Result<()> {
    let config = SimulationConfig {
        buffer,
        ..Default::default()
    };
    let mut sim = match seed {
        Some(seed) => Simulation::seeded(config, seed),
        None => Simulation::new(config),
    }
    .context("Invalid buffer configuration")?;

    // Ingest-heavy mix so the buffer reaches capacity and starts evicting
    for round in 0..steps {
        match round % 8 {
            0 | 1 | 4 => sim.add_fact(),
            2 | 5 => sim.query(),
            3 | 6 => sim.advance(),
            _ => sim.conflict(),
        }
    }

    let output = json!({
        "snapshot": sim.snapshot(),
        "stats": sim.buffer().stats(),
        "log": sim.log().collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn cmd_curve(confidence: f64, usage: u32, decay_rate: f64, samples: usize, step: f64) -> Result<()> {
    if !decay_rate.is_finite() || decay_rate < 0.0 {
        anyhow::bail!("Decay rate must be finite and non-negative, got {decay_rate}");
    }

    let output = json!({
        "horizon_score": scoring::score_at_horizon(confidence, usage, decay_rate),
        "curve": scoring::decay_curve(confidence, usage, decay_rate, samples, step),
        "baseline": scoring::decay_curve(0.5, 0, decay_rate, samples, step),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
