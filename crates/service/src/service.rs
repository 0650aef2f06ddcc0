//! Prediction service: the synchronous request pipeline
//!
//! request → validate/parse → encode → normalize → predict → persist →
//! respond. The model bundle is immutable shared state; the history
//! store is the only mutable resource and each append is independent.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use farecast_core::{ModelBundle, Result};

use crate::history::{HistoryStore, PredictionEntry};
use crate::types::{PredictionRequest, PredictionResponse};

pub struct PredictionService {
    bundle: Arc<ModelBundle>,
    history: Arc<dyn HistoryStore>,
}

impl PredictionService {
    pub fn new(bundle: Arc<ModelBundle>, history: Arc<dyn HistoryStore>) -> Self {
        Self { bundle, history }
    }

    /// Serve one prediction request. Fails independently per request;
    /// no retries. The history append happens only after a successful
    /// prediction and only when the request names a user.
    pub fn predict(&self, request: PredictionRequest) -> Result<PredictionResponse> {
        let user = request.user.clone();
        let trip = request.into_trip()?;
        let price = self.bundle.predict(&trip)?;

        debug!(route = %trip.route(), price, "prediction served");

        let response = PredictionResponse {
            price,
            route: trip.route(),
            airline: trip.airline.clone(),
            travel_date: trip.travel_date.format("%Y-%m-%d").to_string(),
        };

        if let Some(user) = user {
            self.history.append(PredictionEntry {
                user,
                airline: response.airline.clone(),
                route: response.route.clone(),
                travel_date: response.travel_date.clone(),
                fare_label: trip.fare_label,
                price,
                predicted_at: Utc::now(),
            });
        }

        Ok(response)
    }

    pub fn history_for(&self, user: &str) -> Vec<PredictionEntry> {
        self.history.for_user(user)
    }

    pub fn delete_user_history(&self, user: &str) -> usize {
        let removed = self.history.delete_user(user);
        if removed > 0 {
            warn!(user, removed, "user history deleted");
        }
        removed
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }
}
