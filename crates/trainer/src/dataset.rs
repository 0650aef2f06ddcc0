//! CSV dataset loading and deterministic splitting
//!
//! Reads the historical flight corpus (one header row, comma separated)
//! and provides a seeded shuffle and train/test split.

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::path::Path;

use farecast_core::{parse_departure_time, parse_travel_date, TrainingRow, TripRecord};

/// Columns the training file must provide, by header name.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "airline",
    "travel_date",
    "origin",
    "destination",
    "route",
    "departure_time",
    "duration_hours",
    "stop_count",
    "fare_label",
    "price",
];

/// Historical flights with realized prices.
#[derive(Clone, Debug)]
pub struct FlightDataset {
    pub rows: Vec<TrainingRow>,
}

impl FlightDataset {
    /// Load the dataset from a headered CSV file.
    ///
    /// Extra columns are tolerated; the required ones are located by
    /// header name. Parse failures carry the offending line number.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read {}", path.as_ref().display()))?;

        let mut lines = content.lines().enumerate();

        let (_, header) = lines
            .find(|(_, line)| !line.trim().is_empty())
            .context("dataset file is empty")?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();

        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, name) in columns.iter().enumerate() {
            index.insert(name, i);
        }
        for required in REQUIRED_COLUMNS {
            if !index.contains_key(required) {
                bail!("dataset is missing required column {required:?}");
            }
        }
        let col = |name: &str| index[name];

        let mut rows = Vec::new();

        for (line_idx, line) in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != columns.len() {
                bail!(
                    "line {}: expected {} fields, got {}",
                    line_idx + 1,
                    columns.len(),
                    fields.len()
                );
            }

            let travel_date = parse_travel_date(fields[col("travel_date")])
                .with_context(|| format!("line {}: bad travel_date", line_idx + 1))?;
            let (departure_hour, departure_minute) =
                parse_departure_time(fields[col("departure_time")])
                    .with_context(|| format!("line {}: bad departure_time", line_idx + 1))?;
            let duration_hours: f64 = fields[col("duration_hours")]
                .parse()
                .with_context(|| format!("line {}: bad duration_hours", line_idx + 1))?;
            let stop_count: u32 = fields[col("stop_count")]
                .parse()
                .with_context(|| format!("line {}: bad stop_count", line_idx + 1))?;
            let price: f64 = fields[col("price")]
                .parse()
                .with_context(|| format!("line {}: bad price", line_idx + 1))?;

            rows.push(TrainingRow {
                trip: TripRecord {
                    airline: fields[col("airline")].to_string(),
                    travel_date,
                    origin: fields[col("origin")].to_string(),
                    destination: fields[col("destination")].to_string(),
                    departure_hour,
                    departure_minute,
                    duration_hours,
                    stop_count,
                    fare_label: fields[col("fare_label")].to_string(),
                },
                price,
            });
        }

        if rows.is_empty() {
            bail!("dataset has no data rows");
        }

        Ok(Self { rows })
    }

    /// Deterministically shuffle rows with a seeded RNG.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.rows.shuffle(&mut rng);
    }

    /// Split off the last `test_fraction` of rows as the held-out set.
    ///
    /// Call `shuffle` first for a randomized split; the split itself is
    /// positional so it stays reproducible.
    pub fn split(&self, test_fraction: f64) -> (Vec<TrainingRow>, Vec<TrainingRow>) {
        let n = self.rows.len();
        let mut test_len = (n as f64 * test_fraction).round() as usize;
        if test_len >= n {
            test_len = n.saturating_sub(1);
        }
        let train_len = n - test_len;

        (
            self.rows[..train_len].to_vec(),
            self.rows[train_len..].to_vec(),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// (min, max, mean) of realized prices, for the training report.
    pub fn price_summary(&self) -> (f64, f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;

        for row in &self.rows {
            min = min.min(row.price);
            max = max.max(row.price);
            sum += row.price;
        }

        (min, max, sum / self.rows.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "airline,travel_date,origin,destination,route,departure_time,duration_hours,stop_count,fare_label,price";

    fn sample_csv() -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{HEADER}")?;
        writeln!(
            file,
            "LATAM Perú,2024-01-01,LIM,CUZ,LIM-CUZ,08:30,1.2,0,Incluye equipaje,310.50"
        )?;
        writeln!(
            file,
            "Sky Airline Perú,2024-03-10,LIM,AQP,LIM-AQP,14:15,1.3,0,Clase económica,250.00"
        )?;
        writeln!(
            file,
            "LATAM Perú,2024-07-20,CUZ,LIM,CUZ-LIM,19:45,1.2,1,Clase business,620.75"
        )?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_csv() -> Result<()> {
        let file = sample_csv()?;
        let dataset = FlightDataset::from_csv(file.path())?;

        assert_eq!(dataset.len(), 3);
        let first = &dataset.rows[0];
        assert_eq!(first.trip.airline, "LATAM Perú");
        assert_eq!(first.trip.route(), "LIM-CUZ");
        assert_eq!(first.trip.departure_hour, 8);
        assert_eq!(first.trip.departure_minute, 30);
        assert_eq!(first.price, 310.50);

        Ok(())
    }

    #[test]
    fn test_missing_column_is_rejected() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "airline,travel_date,origin")?;
        writeln!(file, "LATAM Perú,2024-01-01,LIM")?;
        file.flush()?;

        assert!(FlightDataset::from_csv(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_bad_row_reports_line_number() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{HEADER}")?;
        writeln!(
            file,
            "LATAM Perú,not-a-date,LIM,CUZ,LIM-CUZ,08:30,1.2,0,Incluye equipaje,310.50"
        )?;
        file.flush()?;

        let err = FlightDataset::from_csv(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        Ok(())
    }

    #[test]
    fn test_shuffle_is_deterministic() -> Result<()> {
        let file = sample_csv()?;
        let mut a = FlightDataset::from_csv(file.path())?;
        let mut b = a.clone();

        a.shuffle(42);
        b.shuffle(42);
        assert_eq!(a.rows, b.rows);

        Ok(())
    }

    #[test]
    fn test_split_sizes() -> Result<()> {
        let file = sample_csv()?;
        let dataset = FlightDataset::from_csv(file.path())?;

        let (train, test) = dataset.split(0.34);
        assert_eq!(train.len(), 2);
        assert_eq!(test.len(), 1);

        // Train side never empties out.
        let (train, test) = dataset.split(1.0);
        assert_eq!(train.len(), 1);
        assert_eq!(test.len(), 2);

        Ok(())
    }

    #[test]
    fn test_price_summary() -> Result<()> {
        let file = sample_csv()?;
        let dataset = FlightDataset::from_csv(file.path())?;
        let (min, max, mean) = dataset.price_summary();

        assert_eq!(min, 250.00);
        assert_eq!(max, 620.75);
        assert!((mean - (310.50 + 250.00 + 620.75) / 3.0).abs() < 1e-9);
        Ok(())
    }
}
