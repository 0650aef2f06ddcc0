//! Model bundle: everything a serving process needs to price a trip
//!
//! The bundle holds the fitted forest, encoding tables, normalization
//! parameters, and feature-name list as a single immutable unit. It is
//! constructed once (from a training run or from disk) and shared
//! read-only by concurrent prediction requests; no request mutates it.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::canon::to_canonical_json;
use crate::encoder::{FittedEncoder, FEATURE_COUNT};
use crate::errors::{FarecastError, Result};
use crate::forest::ForestModel;
use crate::record::TripRecord;
use crate::scaler::Normalization;

/// Domain floor in soles: no real domestic fare exists below this.
pub const PRICE_FLOOR: f64 = 150.0;

/// Artifact file names inside a model directory.
pub const FOREST_FILE: &str = "forest.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const ENCODERS_FILE: &str = "encoders.json";
pub const FEATURES_FILE: &str = "features.json";
pub const FOREST_HASH_FILE: &str = "forest.hash";

const ARTIFACT_FILES: [&str; 4] = [FOREST_FILE, SCALER_FILE, ENCODERS_FILE, FEATURES_FILE];

/// Clamp a raw model output to the reported price: round to 2 decimals,
/// then apply the domain floor. Applied uniformly by `predict`, never
/// left to callers.
pub fn clamp_price(raw: f64) -> f64 {
    let rounded = (raw * 100.0).round() / 100.0;
    rounded.max(PRICE_FLOOR)
}

/// Immutable fitted state for serving predictions.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    forest: ForestModel,
    encoder: FittedEncoder,
    scaler: Normalization,
    feature_names: Vec<String>,
}

impl ModelBundle {
    /// Assemble and validate a bundle from freshly trained parts.
    pub fn new(
        forest: ForestModel,
        encoder: FittedEncoder,
        scaler: Normalization,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        forest.validate()?;

        if forest.feature_count != FEATURE_COUNT {
            return Err(FarecastError::FeatureSizeMismatch {
                expected: FEATURE_COUNT,
                actual: forest.feature_count,
            });
        }
        if feature_names.len() != FEATURE_COUNT {
            return Err(FarecastError::FeatureSizeMismatch {
                expected: FEATURE_COUNT,
                actual: feature_names.len(),
            });
        }
        if scaler.means.len() != FEATURE_COUNT || scaler.std_devs.len() != FEATURE_COUNT {
            return Err(FarecastError::FeatureSizeMismatch {
                expected: FEATURE_COUNT,
                actual: scaler.means.len(),
            });
        }

        Ok(Self {
            forest,
            encoder,
            scaler,
            feature_names,
        })
    }

    /// Load all four artifacts from a model directory.
    ///
    /// Any missing artifact means predictions are unavailable; the
    /// caller may trigger a fresh training run, but no retry happens
    /// here.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        for file in ARTIFACT_FILES {
            if !dir.join(file).exists() {
                return Err(FarecastError::ModelUnavailable {
                    missing: file.to_string(),
                });
            }
        }

        let forest = ForestModel::load_json(dir.join(FOREST_FILE))?;
        let scaler: Normalization =
            serde_json::from_str(&fs::read_to_string(dir.join(SCALER_FILE))?)?;
        let encoder: FittedEncoder =
            serde_json::from_str(&fs::read_to_string(dir.join(ENCODERS_FILE))?)?;
        let feature_names: Vec<String> =
            serde_json::from_str(&fs::read_to_string(dir.join(FEATURES_FILE))?)?;

        let bundle = Self::new(forest, encoder, scaler, feature_names)?;
        info!(
            trees = bundle.forest.num_trees(),
            min_date = %bundle.encoder.min_date,
            "model bundle loaded from {}",
            dir.display()
        );
        Ok(bundle)
    }

    /// Persist all four artifacts plus the forest hash file.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        fs::write(dir.join(FOREST_FILE), to_canonical_json(&self.forest)?)?;
        fs::write(dir.join(SCALER_FILE), to_canonical_json(&self.scaler)?)?;
        fs::write(dir.join(ENCODERS_FILE), to_canonical_json(&self.encoder)?)?;
        fs::write(dir.join(FEATURES_FILE), to_canonical_json(&self.feature_names)?)?;
        fs::write(dir.join(FOREST_HASH_FILE), self.forest.hash_hex()?)?;

        Ok(())
    }

    /// Price a single trip: validate, encode, scale, score, clamp.
    pub fn predict(&self, trip: &TripRecord) -> Result<f64> {
        trip.validate()?;

        let raw = self.encoder.raw_features(trip)?;
        let scaled = self.scaler.apply(&raw)?;
        let price = self.forest.score(&scaled)?;

        Ok(clamp_price(price))
    }

    pub fn forest(&self) -> &ForestModel {
        &self.forest
    }

    pub fn encoder(&self) -> &FittedEncoder {
        &self.encoder
    }

    pub fn scaler(&self) -> &Normalization {
        &self.scaler
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}
