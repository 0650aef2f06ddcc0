//! Exact-greedy regression tree construction
//!
//! Builds a variance-reduction CART over the scaled feature matrix.
//! Split search scans each feature in sorted order with prefix sums;
//! ties break deterministically on (feature index, threshold) so the
//! same inputs always yield the same tree.

use farecast_core::{Node, Tree, FEATURE_COUNT};
use std::cmp::Ordering;

/// Growth limits for a single tree.
#[derive(Clone, Debug)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 20,
            min_samples_split: 5,
            min_samples_leaf: 2,
        }
    }
}

#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Builds regression trees over a borrowed training matrix.
pub struct CartBuilder<'a> {
    config: TreeConfig,
    matrix: &'a [[f64; FEATURE_COUNT]],
    targets: &'a [f64],
}

impl<'a> CartBuilder<'a> {
    pub fn new(matrix: &'a [[f64; FEATURE_COUNT]], targets: &'a [f64], config: TreeConfig) -> Self {
        assert_eq!(matrix.len(), targets.len());
        Self {
            config,
            matrix,
            targets,
        }
    }

    /// Build a tree over the given sample indices (bootstrap sample for
    /// forests; indices may repeat).
    pub fn build(&self, indices: &[usize]) -> Tree {
        let mut nodes = Vec::new();
        self.build_node(indices, 0, &mut nodes);
        Tree::new(nodes)
    }

    fn build_node(&self, indices: &[usize], depth: usize, nodes: &mut Vec<Node>) -> i32 {
        let current = nodes.len() as i32;
        let leaf_value = self.mean_target(indices);

        if depth >= self.config.max_depth || indices.len() < self.config.min_samples_split {
            nodes.push(Node::leaf(leaf_value));
            return current;
        }

        let split = match self.find_best_split(indices) {
            Some(s) => s,
            None => {
                nodes.push(Node::leaf(leaf_value));
                return current;
            }
        };

        let (left, right) = self.partition(indices, split.feature_idx, split.threshold);
        if left.len() < self.config.min_samples_leaf || right.len() < self.config.min_samples_leaf {
            nodes.push(Node::leaf(leaf_value));
            return current;
        }

        nodes.push(Node::internal(split.feature_idx as i32, split.threshold, 0, 0));

        let left_idx = self.build_node(&left, depth + 1, nodes);
        let right_idx = self.build_node(&right, depth + 1, nodes);

        nodes[current as usize].left = left_idx;
        nodes[current as usize].right = right_idx;

        current
    }

    /// Best split by variance reduction, scanning each feature in sorted
    /// order. Maximizing sum_l²/n_l + sum_r²/n_r is equivalent to
    /// minimizing the weighted child variance.
    fn find_best_split(&self, indices: &[usize]) -> Option<SplitCandidate> {
        let n = indices.len();
        let total_sum: f64 = indices.iter().map(|&i| self.targets[i]).sum();
        let parent_score = total_sum * total_sum / n as f64;

        let mut best: Option<SplitCandidate> = None;

        for feature_idx in 0..FEATURE_COUNT {
            let mut order = indices.to_vec();
            order.sort_by(|&a, &b| {
                self.matrix[a][feature_idx]
                    .partial_cmp(&self.matrix[b][feature_idx])
                    .unwrap_or(Ordering::Equal)
                    .then(a.cmp(&b))
            });

            let mut left_sum = 0.0;

            for pos in 0..n - 1 {
                left_sum += self.targets[order[pos]];

                let value = self.matrix[order[pos]][feature_idx];
                let next = self.matrix[order[pos + 1]][feature_idx];
                if value == next {
                    continue;
                }

                let left_n = pos + 1;
                let right_n = n - left_n;
                if left_n < self.config.min_samples_leaf
                    || right_n < self.config.min_samples_leaf
                {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let gain = left_sum * left_sum / left_n as f64
                    + right_sum * right_sum / right_n as f64
                    - parent_score;
                let threshold = (value + next) / 2.0;

                let better = match &best {
                    None => gain > 0.0,
                    Some(b) => {
                        gain > b.gain
                            || (gain == b.gain
                                && (feature_idx < b.feature_idx
                                    || (feature_idx == b.feature_idx && threshold < b.threshold)))
                    }
                };

                if better {
                    best = Some(SplitCandidate {
                        feature_idx,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }

    fn partition(&self, indices: &[usize], feature_idx: usize, threshold: f64) -> (Vec<usize>, Vec<usize>) {
        let mut left = Vec::new();
        let mut right = Vec::new();

        for &idx in indices {
            if self.matrix[idx][feature_idx] <= threshold {
                left.push(idx);
            } else {
                right.push(idx);
            }
        }

        (left, right)
    }

    fn mean_target(&self, indices: &[usize]) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        let sum: f64 = indices.iter().map(|&i| self.targets[i]).sum();
        sum / indices.len() as f64
    }
}
