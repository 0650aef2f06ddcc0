//! Per-user prediction history
//!
//! Append-only: records are never mutated after insertion and are
//! removed only when the owning user is deleted.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// One served prediction, as stored in history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionEntry {
    pub user: String,
    pub airline: String,
    pub route: String,
    pub travel_date: String,
    pub fare_label: String,
    pub price: f64,
    pub predicted_at: DateTime<Utc>,
}

/// Storage for served predictions. Each append is a single independent
/// insert scoped to one user; no cross-request coordination.
pub trait HistoryStore: Send + Sync {
    fn append(&self, entry: PredictionEntry);
    fn for_user(&self, user: &str) -> Vec<PredictionEntry>;
    /// Cascading user deletion: drops every entry owned by the user.
    fn delete_user(&self, user: &str) -> usize;
}

/// In-memory history store.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: RwLock<Vec<PredictionEntry>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl HistoryStore for MemoryHistory {
    fn append(&self, entry: PredictionEntry) {
        self.entries.write().push(entry);
    }

    fn for_user(&self, user: &str) -> Vec<PredictionEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.user == user)
            .cloned()
            .collect()
    }

    fn delete_user(&self, user: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.user != user);
        before - entries.len()
    }
}
