//! Flight roster loading: the kernel's flight list may be built
//! programmatically or imported from a CSV file with columns
//! `flight_number,departure_time,seats,fill_percent,shape_tag`, mirroring
//! the CSV-if-present convention used elsewhere in this codebase for
//! optional reference data. `departure_time` is `HH:MM` and is converted
//! to minutes since midnight.
//!
//! A malformed individual row is logged and skipped; the whole file only
//! fails to load if it cannot be opened or has no readable header.

use std::path::{Path, PathBuf};

use chrono::{NaiveTime, Timelike};
use serde::Deserialize;

use crate::errors::Error;
use crate::models::Flight;

#[derive(Debug, Deserialize)]
struct FlightRecord {
    flight_number: String,
    departure_time: String,
    seats: u32,
    fill_percent: f64,
    shape_tag: String,
}

/// Reads every well-formed row of `path` into a `Flight`. Rows with an
/// unparseable `departure_time` or non-finite `fill_percent` are logged
/// and skipped rather than aborting the import.
pub fn load_flights_from_csv(path: &Path) -> Result<Vec<Flight>, Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut flights = Vec::new();

    for (row, result) in reader.deserialize::<FlightRecord>().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("flight roster row {row}: malformed, skipped ({e})");
                continue;
            }
        };

        let Ok(time) = NaiveTime::parse_from_str(&record.departure_time, "%H:%M") else {
            log::warn!(
                "flight roster row {row}: unparseable departure_time '{}', skipped",
                record.departure_time
            );
            continue;
        };
        if !record.fill_percent.is_finite() {
            log::warn!(
                "flight roster row {row}: non-finite fill_percent, skipped"
            );
            continue;
        }

        let minutes_since_midnight = time.hour() * 60 + time.minute();

        flights.push(Flight::new(
            record.flight_number,
            minutes_since_midnight,
            record.seats,
            record.fill_percent,
            record.shape_tag,
        ));
    }

    log::info!("loaded {} flights from {}", flights.len(), path.display());
    Ok(flights)
}

/// Candidate locations searched, in order, for an optional `flights.csv`:
/// the current working directory, then the platform application-data
/// directory.
pub fn flight_csv_candidate_paths(app_data_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("flights.csv")];
    if let Some(dir) = app_data_dir {
        candidates.push(dir.join("flights.csv"));
    }
    candidates
}

/// Returns the first candidate path that exists on disk, if any.
pub fn find_flight_csv(app_data_dir: Option<&Path>) -> Option<PathBuf> {
    flight_csv_candidate_paths(app_data_dir)
        .into_iter()
        .find(|p| p.exists())
}
