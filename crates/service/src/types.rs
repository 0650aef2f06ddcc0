//! Wire types for the prediction API

use serde::{Deserialize, Serialize};

use farecast_core::{parse_departure_time, parse_travel_date, Result, TripRecord};

/// A prediction request as received on the wire. Date and time arrive
/// as raw strings and are parsed during validation.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRequest {
    pub airline: String,
    /// `YYYY-MM-DD`
    pub travel_date: String,
    pub origin: String,
    pub destination: String,
    /// `HH:MM`
    pub departure_time: String,
    pub duration_hours: f64,
    pub stop_count: u32,
    pub fare_label: String,
    /// Optional user to attribute the prediction to in history.
    #[serde(default)]
    pub user: Option<String>,
}

impl PredictionRequest {
    /// Parse the raw fields into a trip record. Malformed dates and
    /// times are rejected here, before any encoding happens.
    pub fn into_trip(self) -> Result<TripRecord> {
        let travel_date = parse_travel_date(&self.travel_date)?;
        let (departure_hour, departure_minute) = parse_departure_time(&self.departure_time)?;

        Ok(TripRecord {
            airline: self.airline,
            travel_date,
            origin: self.origin,
            destination: self.destination,
            departure_hour,
            departure_minute,
            duration_hours: self.duration_hours,
            stop_count: self.stop_count,
            fare_label: self.fare_label,
        })
    }
}

/// A successful prediction, echoing the identifying request fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    /// Estimated fare in soles, two-decimal precision.
    pub price: f64,
    pub route: String,
    pub airline: String,
    pub travel_date: String,
}

/// JSON error payload returned for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
