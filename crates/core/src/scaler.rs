//! Per-feature standardization frozen at training time
//!
//! Parameters are computed once over the training matrix and never
//! recomputed from request data.

use serde::{Deserialize, Serialize};

use crate::encoder::FEATURE_COUNT;
use crate::errors::{FarecastError, Result};

/// Column-wise mean and standard deviation of the training matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Normalization {
    pub means: Vec<f64>,
    pub std_devs: Vec<f64>,
}

impl Normalization {
    /// Fit means and population standard deviations (ddof = 0) over the
    /// raw training matrix. A zero standard deviation is stored as 1 so
    /// constant columns scale to exactly zero.
    pub fn fit(matrix: &[[f64; FEATURE_COUNT]]) -> Result<Self> {
        if matrix.is_empty() {
            return Err(FarecastError::InvalidModel(
                "cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let n = matrix.len() as f64;
        let mut means = vec![0.0; FEATURE_COUNT];
        let mut std_devs = vec![0.0; FEATURE_COUNT];

        for row in matrix {
            for (i, &value) in row.iter().enumerate() {
                means[i] += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        for row in matrix {
            for (i, &value) in row.iter().enumerate() {
                let diff = value - means[i];
                std_devs[i] += diff * diff;
            }
        }
        for std in &mut std_devs {
            *std = (*std / n).sqrt();
            if *std == 0.0 {
                *std = 1.0;
            }
        }

        Ok(Self { means, std_devs })
    }

    /// Standardize one raw feature vector: `(x - mean) / std` per column.
    pub fn apply(&self, raw: &[f64; FEATURE_COUNT]) -> Result<[f64; FEATURE_COUNT]> {
        if self.means.len() != FEATURE_COUNT || self.std_devs.len() != FEATURE_COUNT {
            return Err(FarecastError::FeatureSizeMismatch {
                expected: FEATURE_COUNT,
                actual: self.means.len(),
            });
        }

        let mut scaled = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            scaled[i] = (raw[i] - self.means[i]) / self.std_devs[i];
        }
        Ok(scaled)
    }

    /// Standardize a batch of raw feature vectors.
    pub fn apply_matrix(&self, matrix: &[[f64; FEATURE_COUNT]]) -> Result<Vec<[f64; FEATURE_COUNT]>> {
        matrix.iter().map(|row| self.apply(row)).collect()
    }
}
