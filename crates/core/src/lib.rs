//! Farecast core: airfare price prediction for Peru domestic flights
//!
//! Turns a raw trip record into a fixed-order numeric feature vector and
//! scores it with a random-forest regressor, using encoder and scaler
//! state frozen at training time.
//!
//! Modules:
//! - `record`: trip records, parsing, request-level validation
//! - `encoder`: categorical encoding tables and raw feature derivation
//! - `scaler`: per-feature normalization parameters
//! - `forest`: random-forest trees, scoring, persistence
//! - `bundle`: the immutable model bundle used by serving processes
//! - `canon`: canonical JSON and blake3 hashing for artifacts

pub mod bundle;
pub mod canon;
pub mod encoder;
pub mod errors;
pub mod forest;
pub mod record;
pub mod scaler;

pub use bundle::{clamp_price, ModelBundle, PRICE_FLOOR};
pub use encoder::{CategoryTable, EncodingTables, FittedEncoder, FEATURE_COUNT, FEATURE_NAMES};
pub use errors::{FarecastError, Result};
pub use forest::{ForestModel, Node, Tree};
pub use record::{parse_departure_time, parse_travel_date, TrainingRow, TripRecord};
pub use scaler::Normalization;

/// Crate version string for reports and artifacts
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
