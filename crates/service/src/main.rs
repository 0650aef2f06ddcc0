//! Farecast Service entry point
//!
//! Loads the model bundle once, then serves predictions over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use farecast_core::ModelBundle;
use farecast_service::{http, MemoryHistory, PredictionService, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "farecast-service")]
#[command(author = "Farecast Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "HTTP prediction service for Peru domestic airfares", long_about = None)]
struct Args {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the model directory from the config
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Override the listen address from the config
    #[arg(long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(model_dir) = args.model_dir {
        config.model_dir = model_dir;
    }
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }

    info!("Starting Farecast Service v{}", env!("CARGO_PKG_VERSION"));
    info!("Loading model bundle from {}", config.model_dir.display());

    // Loaded once; shared read-only for the lifetime of the process.
    let bundle = Arc::new(
        ModelBundle::load(&config.model_dir)
            .context("failed to load model bundle; run farecast-train first")?,
    );
    let history = Arc::new(MemoryHistory::new());
    let service = Arc::new(PredictionService::new(bundle, history));

    info!("Listening on {}", config.listen_addr);
    warp::serve(http::routes(service)).run(config.listen_addr).await;

    Ok(())
}

fn init_logging() {
    let env = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(env)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
