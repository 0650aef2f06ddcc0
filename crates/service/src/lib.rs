//! Farecast prediction service
//!
//! Thin HTTP layer over the immutable model bundle: request
//! validation, prediction, per-user history, and a rule-based travel
//! advisor. The bundle is loaded once at startup and shared read-only
//! across requests.

pub mod advisor;
pub mod config;
pub mod history;
pub mod http;
pub mod service;
pub mod types;

pub use advisor::{advise, Advice, AdvisorContext};
pub use config::ServiceConfig;
pub use history::{HistoryStore, MemoryHistory, PredictionEntry};
pub use service::PredictionService;
pub use types::{PredictionRequest, PredictionResponse};
