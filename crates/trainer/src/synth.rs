//! Synthetic Peru domestic flight corpus
//!
//! Produces a plausible training CSV when no historical dump is at
//! hand: real IATA route pairs, the common national carriers, fare
//! labels with price multipliers, weekend and high-season uplift.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::path::Path;

use farecast_core::{TrainingRow, TripRecord};

/// (airline, price multiplier)
pub const AIRLINES: [(&str, f64); 5] = [
    ("LATAM Perú", 1.00),
    ("Sky Airline Perú", 0.80),
    ("JetSMART Perú", 0.75),
    ("VIVA Air Perú", 0.70),
    ("Avianca Perú", 0.95),
];

/// (fare label, price multiplier)
pub const FARE_LABELS: [(&str, f64); 8] = [
    ("Solo equipaje de mano", 0.85),
    ("Incluye equipaje", 1.0),
    ("Asiento preferente", 1.2),
    ("Clase económica", 0.9),
    ("Clase business", 2.3),
    ("Incluye snack", 1.1),
    ("WiFi incluido", 1.15),
    ("Cancelación gratuita", 1.3),
];

/// (origin, destination, typical duration in hours)
pub const ROUTES: [(&str, &str, f64); 16] = [
    ("LIM", "AQP", 1.3),
    ("LIM", "CUZ", 1.2),
    ("LIM", "TRU", 1.1),
    ("LIM", "PIU", 1.5),
    ("LIM", "IQT", 1.9),
    ("LIM", "TCQ", 1.6),
    ("LIM", "JUL", 1.4),
    ("LIM", "PCL", 1.2),
    ("LIM", "TPP", 1.4),
    ("LIM", "CIX", 1.2),
    ("CUZ", "AQP", 1.0),
    ("CUZ", "JUL", 0.8),
    ("TRU", "PIU", 1.0),
    ("TRU", "CIX", 0.8),
    ("AQP", "TCQ", 0.9),
    ("AQP", "JUL", 0.9),
];

const DEPARTURE_MINUTES: [u32; 4] = [0, 15, 30, 45];

/// Generator parameters.
#[derive(Clone, Debug)]
pub struct SynthConfig {
    pub rows: usize,
    pub seed: u64,
    pub start_date: NaiveDate,
    pub span_days: i64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            rows: 10_000,
            seed: 42,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            span_days: 365,
        }
    }
}

/// Generate a deterministic synthetic corpus for the given config.
pub fn generate(config: &SynthConfig) -> Vec<TrainingRow> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut rows = Vec::with_capacity(config.rows);

    for _ in 0..config.rows {
        let (origin, destination, typical_duration) = ROUTES[rng.gen_range(0..ROUTES.len())];
        let (airline, airline_mult) = AIRLINES[rng.gen_range(0..AIRLINES.len())];
        let (fare_label, fare_mult) = FARE_LABELS[rng.gen_range(0..FARE_LABELS.len())];

        let travel_date = config.start_date + Duration::days(rng.gen_range(0..config.span_days));
        let departure_hour = rng.gen_range(5..22);
        let departure_minute = DEPARTURE_MINUTES[rng.gen_range(0..DEPARTURE_MINUTES.len())];

        let duration_hours =
            ((typical_duration + rng.gen_range(-0.1..0.1)) * 10.0).round() / 10.0;
        let duration_hours = duration_hours.max(0.5);

        // 85% nonstop, 10% one stop, 5% two stops.
        let stop_count = match rng.gen_range(0..100) {
            0..=84 => 0,
            85..=94 => 1,
            _ => 2,
        };

        let mut price = (150.0 + duration_hours * 80.0) * airline_mult * fare_mult;
        if travel_date.weekday().num_days_from_monday() >= 4 {
            price *= 1.2; // Friday through Sunday
        }
        if travel_date.month() == 7 || travel_date.month() == 12 {
            price *= 1.25; // high season
        }
        price += rng.gen_range(-20.0..20.0);
        let price = ((price.max(120.0)) * 100.0).round() / 100.0;

        rows.push(TrainingRow {
            trip: TripRecord {
                airline: airline.to_string(),
                travel_date,
                origin: origin.to_string(),
                destination: destination.to_string(),
                departure_hour,
                departure_minute,
                duration_hours,
                stop_count,
                fare_label: fare_label.to_string(),
            },
            price,
        });
    }

    rows
}

/// Write rows as the training CSV the trainer consumes.
pub fn write_csv<P: AsRef<Path>>(rows: &[TrainingRow], path: P) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())
        .with_context(|| format!("failed to create {}", path.as_ref().display()))?;
    let mut writer = std::io::BufWriter::new(file);

    writeln!(
        writer,
        "airline,travel_date,origin,destination,route,departure_time,duration_hours,stop_count,fare_label,price"
    )?;

    for row in rows {
        let trip = &row.trip;
        writeln!(
            writer,
            "{},{},{},{},{},{:02}:{:02},{},{},{},{:.2}",
            trip.airline,
            trip.travel_date.format("%Y-%m-%d"),
            trip.origin,
            trip.destination,
            trip.route(),
            trip.departure_hour,
            trip.departure_minute,
            trip.duration_hours,
            trip.stop_count,
            trip.fare_label,
            row.price,
        )?;
    }

    Ok(())
}
