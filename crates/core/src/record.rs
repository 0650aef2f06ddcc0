//! Trip records and request-level validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{FarecastError, Result};

/// A single domestic flight, as seen both in training rows and in
/// prediction requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripRecord {
    pub airline: String,
    pub travel_date: NaiveDate,
    /// IATA code, e.g. "LIM"
    pub origin: String,
    /// IATA code, e.g. "CUZ"
    pub destination: String,
    pub departure_hour: u32,
    pub departure_minute: u32,
    pub duration_hours: f64,
    pub stop_count: u32,
    /// Fare information label, e.g. "Incluye equipaje"
    pub fare_label: String,
}

impl TripRecord {
    /// Route string in `ORIG-DEST` form.
    pub fn route(&self) -> String {
        format!("{}-{}", self.origin, self.destination)
    }

    /// Request-level validation, performed before any feature encoding.
    ///
    /// A trip with identical origin and destination has a zero-length
    /// route and is rejected outright rather than encoded.
    pub fn validate(&self) -> Result<()> {
        if self.origin.eq_ignore_ascii_case(&self.destination) {
            return Err(FarecastError::SameOriginDestination(self.origin.clone()));
        }
        Ok(())
    }
}

/// A historical flight with its realized fare, used for training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingRow {
    pub trip: TripRecord,
    /// Realized price in soles (S/)
    pub price: f64,
}

/// Parse a `YYYY-MM-DD` travel date string.
pub fn parse_travel_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| FarecastError::InvalidDate {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Parse an `HH:MM` departure time into (hour, minute).
pub fn parse_departure_time(value: &str) -> Result<(u32, u32)> {
    let invalid = || FarecastError::InvalidTime {
        value: value.to_string(),
    };

    let (hour_str, minute_str) = value.trim().split_once(':').ok_or_else(invalid)?;
    let hour: u32 = hour_str.parse().map_err(|_| invalid())?;
    let minute: u32 = minute_str.parse().map_err(|_| invalid())?;

    if hour > 23 || minute > 59 {
        return Err(invalid());
    }

    Ok((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lim_cuz() -> TripRecord {
        TripRecord {
            airline: "LATAM Perú".to_string(),
            travel_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            origin: "LIM".to_string(),
            destination: "CUZ".to_string(),
            departure_hour: 8,
            departure_minute: 30,
            duration_hours: 1.2,
            stop_count: 0,
            fare_label: "Incluye equipaje".to_string(),
        }
    }

    #[test]
    fn test_route_string() {
        assert_eq!(lim_cuz().route(), "LIM-CUZ");
    }

    #[test]
    fn test_validate_accepts_distinct_airports() {
        assert!(lim_cuz().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_same_origin_destination() {
        let mut trip = lim_cuz();
        trip.destination = "LIM".to_string();
        let err = trip.validate().unwrap_err();
        assert!(matches!(err, FarecastError::SameOriginDestination(_)));
    }

    #[test]
    fn test_validate_same_airports_case_insensitive() {
        let mut trip = lim_cuz();
        trip.destination = "lim".to_string();
        assert!(trip.validate().is_err());
    }

    #[test]
    fn test_parse_travel_date() {
        let date = parse_travel_date("2024-02-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn test_parse_travel_date_rejects_garbage() {
        assert!(parse_travel_date("01/02/2024").is_err());
        assert!(parse_travel_date("not-a-date").is_err());
        assert!(parse_travel_date("").is_err());
    }

    #[test]
    fn test_parse_departure_time() {
        assert_eq!(parse_departure_time("08:30").unwrap(), (8, 30));
        assert_eq!(parse_departure_time("23:59").unwrap(), (23, 59));
        assert_eq!(parse_departure_time(" 5:00 ").unwrap(), (5, 0));
    }

    #[test]
    fn test_parse_departure_time_rejects_out_of_range() {
        assert!(parse_departure_time("24:00").is_err());
        assert!(parse_departure_time("12:60").is_err());
        assert!(parse_departure_time("0830").is_err());
        assert!(parse_departure_time("a:b").is_err());
    }
}
