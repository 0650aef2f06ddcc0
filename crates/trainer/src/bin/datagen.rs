//! Synthetic dataset generator CLI
//!
//! Writes a deterministic Peru domestic flight CSV for training runs
//! and local experiments.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use farecast_trainer::synth::{self, SynthConfig};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "farecast-datagen")]
#[command(author = "Farecast Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Synthetic flight dataset generator", long_about = None)]
struct Args {
    /// Number of rows to generate
    #[arg(short, long, default_value = "10000")]
    rows: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// First travel date in the corpus (YYYY-MM-DD)
    #[arg(long, default_value = "2024-01-01")]
    start_date: NaiveDate,

    /// Number of days the corpus spans
    #[arg(long, default_value = "365")]
    span_days: i64,

    /// Output CSV path
    #[arg(short, long, default_value = "data/flights.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = SynthConfig {
        rows: args.rows,
        seed: args.seed,
        start_date: args.start_date,
        span_days: args.span_days,
    };

    info!(
        "Generating {} rows (seed {}, {} days from {})",
        config.rows, config.seed, config.span_days, config.start_date
    );
    let rows = synth::generate(&config);

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    synth::write_csv(&rows, &args.output)?;

    info!("✓ Wrote {} rows to {}", rows.len(), args.output.display());
    Ok(())
}
