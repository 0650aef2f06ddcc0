//! Offline training pipeline for the fare predictor
//!
//! Loads the historical flight CSV, fits the categorical encoder and
//! feature scaler, grows a random forest, evaluates it on a held-out
//! split and writes the serving bundle to disk.

pub mod cart;
pub mod dataset;
pub mod errors;
pub mod forest_trainer;
pub mod metrics;
pub mod synth;

pub use cart::{CartBuilder, TreeConfig};
pub use dataset::FlightDataset;
pub use errors::TrainerError;
pub use forest_trainer::{ForestConfig, ForestTrainer};
pub use metrics::{evaluate, EvalReport};
pub use synth::SynthConfig;
