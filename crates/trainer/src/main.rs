//! Farecast Trainer CLI
//!
//! Offline trainer producing the serving bundle for the fare predictor.

use anyhow::{Context, Result};
use clap::Parser;
use farecast_core::{FittedEncoder, ModelBundle, Normalization, FEATURE_NAMES};
use farecast_trainer::{metrics, FlightDataset, ForestConfig, ForestTrainer};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "farecast-train")]
#[command(author = "Farecast Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Random-forest trainer for Peru domestic fare prediction", long_about = None)]
struct Args {
    /// Input CSV dataset path (headered, see docs for required columns)
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for the model bundle
    #[arg(short, long, default_value = "models/farecast")]
    output: PathBuf,

    /// Number of trees in the forest
    #[arg(long, default_value = "200")]
    trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value = "20")]
    max_depth: usize,

    /// Minimum samples required to split a node
    #[arg(long, default_value = "5")]
    min_samples_split: usize,

    /// Minimum samples per leaf
    #[arg(long, default_value = "2")]
    min_samples_leaf: usize,

    /// Random seed for shuffling and bootstrap sampling
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value = "0.2")]
    test_fraction: f64,

    /// Skip dataset shuffling
    #[arg(long)]
    no_shuffle: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Farecast Trainer v{}", env!("CARGO_PKG_VERSION"));
    info!("═══════════════════════════════════════════");

    // Load dataset
    info!("Loading dataset from: {}", args.input.display());
    let mut dataset = FlightDataset::from_csv(&args.input).context("Failed to load dataset")?;

    let (price_min, price_max, price_mean) = dataset.price_summary();
    info!("Loaded {} samples", dataset.len());
    info!(
        "  Price range: {:.2}..{:.2} PEN (mean {:.2})",
        price_min, price_max, price_mean
    );

    if !args.no_shuffle {
        info!("Shuffling dataset with seed: {}", args.seed);
        dataset.shuffle(args.seed);
    }

    // Category tables and the date origin come from the full corpus so
    // the held-out split cannot introduce unseen labels.
    let encoder = FittedEncoder::fit(&dataset.rows).context("Failed to fit feature encoder")?;
    info!(
        "Fitted encoder: {} airlines, {} origins, {} destinations, {} fare labels, min_date={}",
        encoder.tables.airline.len(),
        encoder.tables.origin.len(),
        encoder.tables.destination.len(),
        encoder.tables.fare_label.len(),
        encoder.min_date
    );

    let (train_rows, test_rows) = dataset.split(args.test_fraction);
    info!(
        "Split: {} train / {} test rows",
        train_rows.len(),
        test_rows.len()
    );

    let train_raw = encoder
        .raw_matrix(&train_rows)
        .context("Failed to encode training rows")?;
    let test_raw = encoder
        .raw_matrix(&test_rows)
        .context("Failed to encode test rows")?;

    // Scaler statistics come from the training split only.
    let scaler = Normalization::fit(&train_raw).context("Failed to fit scaler")?;
    let train_matrix = scaler
        .apply_matrix(&train_raw)
        .context("Failed to scale training rows")?;
    let test_matrix = scaler
        .apply_matrix(&test_raw)
        .context("Failed to scale test rows")?;

    let train_targets: Vec<f64> = train_rows.iter().map(|r| r.price).collect();
    let test_targets: Vec<f64> = test_rows.iter().map(|r| r.price).collect();

    // Configure trainer
    let config = ForestConfig {
        num_trees: args.trees,
        max_depth: args.max_depth,
        min_samples_split: args.min_samples_split,
        min_samples_leaf: args.min_samples_leaf,
        seed: args.seed,
    };

    info!("Training configuration:");
    info!("  Trees: {}", config.num_trees);
    info!("  Max depth: {}", config.max_depth);
    info!("  Min samples per split: {}", config.min_samples_split);
    info!("  Min samples per leaf: {}", config.min_samples_leaf);
    info!("  Seed: {}", config.seed);

    info!("═══════════════════════════════════════════");
    info!("Starting training...");
    let trainer = ForestTrainer::new(config);
    let model = trainer.fit(&train_matrix, &train_targets)?;

    info!("Training complete!");
    info!("  Trees: {}", model.num_trees());
    info!("  Model hash: {}", model.hash_hex()?);

    // Evaluate raw forest output on the held-out split. No price floor
    // here: the report should reflect the regressor, not the clamp.
    if !test_matrix.is_empty() {
        let predicted: Vec<f64> = test_matrix
            .iter()
            .map(|row| model.score(row))
            .collect::<farecast_core::Result<_>>()?;
        let report = metrics::evaluate(&test_targets, &predicted);

        info!("Held-out evaluation:");
        info!("  RMSE: {:.2} PEN", report.rmse);
        info!("  MAE:  {:.2} PEN", report.mae);
        info!("  R²:   {:.4}", report.r2);
    }

    // Save the serving bundle
    let feature_names = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
    let bundle = ModelBundle::new(model, encoder, scaler, feature_names)?;
    bundle
        .save(&args.output)
        .context("Failed to write model bundle")?;

    info!("═══════════════════════════════════════════");
    info!("✓ Training completed successfully");
    info!("  Bundle: {}", args.output.display());

    Ok(())
}
