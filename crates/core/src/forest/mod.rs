//! Random-forest regressor
//!
//! Decision trees are stored as flat node arrays (node 0 is the root)
//! and traversed iteratively; the forest prediction is the mean of the
//! tree outputs. Models serialize to canonical JSON and are content
//! hashed with blake3 so a loaded artifact can be verified.

mod model;
mod tree;

pub use model::ForestModel;
pub use tree::{Node, Tree};
