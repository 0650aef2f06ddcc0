//! Forest model: averaging ensemble with canonical persistence

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::tree::Tree;
use crate::canon::{hash_canonical_hex, to_canonical_json};
use crate::errors::{FarecastError, Result};

/// A fitted random-forest regressor.
///
/// Immutable after training: lifecycle is create-once (training run),
/// persist, load-many (serving process).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForestModel {
    /// Model format version (always 1 for now)
    pub version: u32,

    /// Width of the feature vectors this forest was trained on
    pub feature_count: usize,

    /// Trees in the ensemble
    pub trees: Vec<Tree>,
}

impl ForestModel {
    pub fn new(trees: Vec<Tree>, feature_count: usize) -> Self {
        Self {
            version: 1,
            feature_count,
            trees,
        }
    }

    /// Validate model structure.
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(FarecastError::InvalidModel(format!(
                "unsupported model version {}",
                self.version
            )));
        }
        if self.feature_count == 0 {
            return Err(FarecastError::InvalidModel(
                "feature_count must be positive".to_string(),
            ));
        }
        if self.trees.is_empty() {
            return Err(FarecastError::InvalidModel(
                "forest has no trees".to_string(),
            ));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.feature_count)
                .map_err(|e| FarecastError::InvalidModel(format!("tree {i}: {e}")))?;
        }

        Ok(())
    }

    /// Predict a continuous value as the mean of the tree outputs.
    pub fn score(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.feature_count {
            return Err(FarecastError::FeatureSizeMismatch {
                expected: self.feature_count,
                actual: features.len(),
            });
        }
        if self.trees.is_empty() {
            return Err(FarecastError::InvalidModel(
                "forest has no trees".to_string(),
            ));
        }

        let sum: f64 = self.trees.iter().map(|tree| tree.evaluate(features)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Blake3 hash of the canonical JSON representation.
    pub fn hash_hex(&self) -> Result<String> {
        hash_canonical_hex(self)
    }

    /// Save as canonical JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, to_canonical_json(self)?)?;
        Ok(())
    }

    /// Load from JSON and validate structure.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let model: ForestModel = serde_json::from_str(&json)?;
        model.validate()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::Node;

    fn two_tree_forest() -> ForestModel {
        let tree1 = Tree::new(vec![
            Node::internal(0, 50.0, 1, 2),
            Node::leaf(100.0),
            Node::leaf(200.0),
        ]);
        let tree2 = Tree::new(vec![
            Node::internal(1, 30.0, 1, 2),
            Node::leaf(150.0),
            Node::leaf(250.0),
        ]);
        ForestModel::new(vec![tree1, tree2], 2)
    }

    #[test]
    fn test_score_is_mean_of_trees() {
        let forest = two_tree_forest();
        // tree1 goes left (100), tree2 goes left (150)
        let score = forest.score(&[30.0, 20.0]).unwrap();
        assert_eq!(score, 125.0);
    }

    #[test]
    fn test_score_rejects_wrong_width() {
        let forest = two_tree_forest();
        let err = forest.score(&[30.0]).unwrap_err();
        assert!(matches!(
            err,
            FarecastError::FeatureSizeMismatch { expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_validate_rejects_empty_forest() {
        let forest = ForestModel::new(vec![], 2);
        assert!(forest.validate().is_err());
    }

    #[test]
    fn test_score_is_deterministic() {
        let forest = two_tree_forest();
        let features = vec![42.0, 31.0];
        assert_eq!(
            forest.score(&features).unwrap(),
            forest.score(&features).unwrap()
        );
    }

    #[test]
    fn test_hash_is_stable_and_content_sensitive() {
        let a = two_tree_forest();
        let b = two_tree_forest();
        assert_eq!(a.hash_hex().unwrap(), b.hash_hex().unwrap());

        let mut c = two_tree_forest();
        c.trees[0].nodes[1] = Node::leaf(999.0);
        assert_ne!(a.hash_hex().unwrap(), c.hash_hex().unwrap());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forest.json");

        let forest = two_tree_forest();
        forest.save_json(&path).unwrap();
        let loaded = ForestModel::load_json(&path).unwrap();

        assert_eq!(forest, loaded);
        assert_eq!(forest.hash_hex().unwrap(), loaded.hash_hex().unwrap());
    }

    #[test]
    fn test_load_rejects_invalid_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forest.json");

        let mut forest = two_tree_forest();
        forest.trees[0].nodes[0].left = 99;
        fs::write(&path, to_canonical_json(&forest).unwrap()).unwrap();

        assert!(ForestModel::load_json(&path).is_err());
    }
}
