//! Categorical encoding tables and raw feature derivation
//!
//! Encoding tables are built once during fitting, with integer codes
//! assigned in the order categories are first encountered, and reused
//! verbatim for every later transform. A category absent from a fitted
//! table is an error, never a default code: guessing would corrupt the
//! numeric meaning of the column.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{FarecastError, Result};
use crate::record::{TrainingRow, TripRecord};

/// Number of features in the model input vector.
pub const FEATURE_COUNT: usize = 14;

/// Feature names in vector order. The order is fixed and must match
/// between training and inference.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "airline",
    "day_of_week",
    "month",
    "quarter",
    "is_weekend",
    "origin",
    "destination",
    "duration_hours",
    "stop_count",
    "fare_label",
    "departure_hour",
    "departure_minute",
    "days_since_start",
    "route_len",
];

/// Bijection from observed category strings to small integer codes.
///
/// `categories[code]` is the original string; codes are assigned in
/// first-seen order during fitting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryTable {
    categories: Vec<String>,
}

impl CategoryTable {
    /// Record a value during fitting, returning its code.
    pub fn observe(&mut self, value: &str) -> i64 {
        match self.index_of(value) {
            Some(code) => code,
            None => {
                self.categories.push(value.to_string());
                (self.categories.len() - 1) as i64
            }
        }
    }

    /// Look up the code for a value, failing if it was never observed.
    pub fn code(&self, column: &'static str, value: &str) -> Result<i64> {
        self.index_of(value)
            .ok_or_else(|| FarecastError::UnknownCategory {
                column,
                value: value.to_string(),
            })
    }

    /// Categories in code order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn index_of(&self, value: &str) -> Option<i64> {
        self.categories.iter().position(|c| c == value).map(|i| i as i64)
    }
}

/// One encoding table per categorical column.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EncodingTables {
    pub airline: CategoryTable,
    pub origin: CategoryTable,
    pub destination: CategoryTable,
    pub fare_label: CategoryTable,
}

/// Fitted encoder state: encoding tables plus the corpus start date.
///
/// `min_date` is the minimum travel date seen during fitting. It is
/// frozen at training time so that `days_since_start` for a given travel
/// date is identical across all future inference calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittedEncoder {
    pub tables: EncodingTables,
    pub min_date: NaiveDate,
}

impl FittedEncoder {
    /// Scan training rows once, building tables in first-seen order and
    /// recording the corpus start date.
    pub fn fit(rows: &[TrainingRow]) -> Result<Self> {
        if rows.is_empty() {
            return Err(FarecastError::InvalidModel(
                "cannot fit encoder on an empty dataset".to_string(),
            ));
        }

        let mut tables = EncodingTables::default();
        let mut min_date = rows[0].trip.travel_date;

        for row in rows {
            tables.airline.observe(&row.trip.airline);
            tables.origin.observe(&row.trip.origin);
            tables.destination.observe(&row.trip.destination);
            tables.fare_label.observe(&row.trip.fare_label);
            min_date = min_date.min(row.trip.travel_date);
        }

        Ok(Self { tables, min_date })
    }

    /// Derive the raw (unscaled) feature vector for one trip.
    ///
    /// Deterministic and side-effect free: no wall-clock time is used,
    /// only the frozen `min_date` baseline.
    pub fn raw_features(&self, trip: &TripRecord) -> Result<[f64; FEATURE_COUNT]> {
        let date = trip.travel_date;
        let day_of_week = date.weekday().num_days_from_monday();
        let month = date.month();
        let quarter = (month - 1) / 3 + 1;
        let is_weekend = if day_of_week >= 5 { 1.0 } else { 0.0 };
        let days_since_start = date.signed_duration_since(self.min_date).num_days();

        Ok([
            self.tables.airline.code("airline", &trip.airline)? as f64,
            day_of_week as f64,
            month as f64,
            quarter as f64,
            is_weekend,
            self.tables.origin.code("origin", &trip.origin)? as f64,
            self.tables.destination.code("destination", &trip.destination)? as f64,
            trip.duration_hours,
            trip.stop_count as f64,
            self.tables.fare_label.code("fare_label", &trip.fare_label)? as f64,
            trip.departure_hour as f64,
            trip.departure_minute as f64,
            days_since_start as f64,
            trip.route().len() as f64,
        ])
    }

    /// Derive raw feature vectors for a batch of training rows.
    pub fn raw_matrix(&self, rows: &[TrainingRow]) -> Result<Vec<[f64; FEATURE_COUNT]>> {
        rows.iter().map(|row| self.raw_features(&row.trip)).collect()
    }
}
