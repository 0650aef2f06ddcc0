//! Random-forest training by bootstrap aggregation
//!
//! Each tree grows on a bootstrap sample drawn from its own seeded RNG,
//! so training is reproducible for a fixed seed regardless of tree
//! count changes elsewhere.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use farecast_core::{ForestModel, FEATURE_COUNT};

use crate::cart::{CartBuilder, TreeConfig};
use crate::errors::TrainerError;

/// Forest training configuration.
#[derive(Clone, Debug)]
pub struct ForestConfig {
    pub num_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            num_trees: 200,
            max_depth: 20,
            min_samples_split: 5,
            min_samples_leaf: 2,
            seed: 42,
        }
    }
}

/// Random-forest trainer.
pub struct ForestTrainer {
    config: ForestConfig,
}

impl ForestTrainer {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    /// Train a forest on the scaled feature matrix.
    pub fn fit(
        &self,
        matrix: &[[f64; FEATURE_COUNT]],
        targets: &[f64],
    ) -> Result<ForestModel, TrainerError> {
        if matrix.is_empty() {
            return Err(TrainerError::Dataset("training matrix is empty".to_string()));
        }
        if matrix.len() != targets.len() {
            return Err(TrainerError::Dataset(format!(
                "matrix has {} rows but {} targets",
                matrix.len(),
                targets.len()
            )));
        }
        if self.config.num_trees == 0 {
            return Err(TrainerError::Training(
                "num_trees must be positive".to_string(),
            ));
        }

        let n = matrix.len();
        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
        };
        let builder = CartBuilder::new(matrix, targets, tree_config);

        info!(
            trees = self.config.num_trees,
            samples = n,
            seed = self.config.seed,
            "training random forest"
        );

        let mut trees = Vec::with_capacity(self.config.num_trees);

        for tree_idx in 0..self.config.num_trees {
            let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(tree_idx as u64));
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

            trees.push(builder.build(&sample));
            debug!("trained tree {}/{}", tree_idx + 1, self.config.num_trees);
        }

        let model = ForestModel::new(trees, FEATURE_COUNT);
        model.validate()?;

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_data() -> (Vec<[f64; FEATURE_COUNT]>, Vec<f64>) {
        let mut matrix = Vec::new();
        let mut targets = Vec::new();
        for i in 0..40 {
            let mut row = [0.0; FEATURE_COUNT];
            row[0] = i as f64;
            row[1] = (i % 7) as f64;
            matrix.push(row);
            targets.push(200.0 + 10.0 * i as f64);
        }
        (matrix, targets)
    }

    fn small_config() -> ForestConfig {
        ForestConfig {
            num_trees: 8,
            max_depth: 6,
            min_samples_split: 4,
            min_samples_leaf: 2,
            seed: 42,
        }
    }

    #[test]
    fn test_fit_builds_requested_tree_count() {
        let (matrix, targets) = toy_data();
        let model = ForestTrainer::new(small_config()).fit(&matrix, &targets).unwrap();
        assert_eq!(model.num_trees(), 8);
        assert_eq!(model.feature_count, FEATURE_COUNT);
    }

    #[test]
    fn test_fit_is_deterministic_for_fixed_seed() {
        let (matrix, targets) = toy_data();
        let a = ForestTrainer::new(small_config()).fit(&matrix, &targets).unwrap();
        let b = ForestTrainer::new(small_config()).fit(&matrix, &targets).unwrap();
        assert_eq!(a.hash_hex().unwrap(), b.hash_hex().unwrap());
    }

    #[test]
    fn test_different_seed_changes_model() {
        let (matrix, targets) = toy_data();
        let a = ForestTrainer::new(small_config()).fit(&matrix, &targets).unwrap();
        let config = ForestConfig {
            seed: 7,
            ..small_config()
        };
        let b = ForestTrainer::new(config).fit(&matrix, &targets).unwrap();
        assert_ne!(a.hash_hex().unwrap(), b.hash_hex().unwrap());
    }

    #[test]
    fn test_predictions_track_targets() {
        let (matrix, targets) = toy_data();
        let model = ForestTrainer::new(small_config()).fit(&matrix, &targets).unwrap();

        // Low-index rows should score well below high-index rows.
        let low = model.score(&matrix[2]).unwrap();
        let high = model.score(&matrix[37]).unwrap();
        assert!(low < high);
    }

    #[test]
    fn test_fit_rejects_empty_and_mismatched_input() {
        let trainer = ForestTrainer::new(small_config());
        assert!(trainer.fit(&[], &[]).is_err());

        let (matrix, mut targets) = toy_data();
        targets.pop();
        assert!(trainer.fit(&matrix, &targets).is_err());
    }
}
