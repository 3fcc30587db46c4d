// Meteo CLI - CSV record source
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! CSV-backed reading source.
//!
//! The file is re-read on every query, the way a remote store would be
//! queried. Expected layout:
//!
//! ```text
//! station,timestamp,temperatura,humidade,pm25
//! STATION_00,1710028800,20.5,61,
//! STATION_00,1710028900,21.0,,12.4
//! ```

use meteo::{FetchOutcome, LatestDateLookup, RawRecord, ReadingSource, SourceError, StationId, TimeWindow};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default name of the station column.
pub const STATION_COLUMN: &str = "station";

/// Reading source over a CSV export.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    station_column: String,
    timestamp_field: String,
}

impl CsvSource {
    /// Create a source over `path`, filtering on `timestamp_field`.
    pub fn new(path: impl Into<PathBuf>, timestamp_field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            station_column: STATION_COLUMN.to_string(),
            timestamp_field: timestamp_field.into(),
        }
    }

    /// Use a different station column name.
    pub fn with_station_column(mut self, column: impl Into<String>) -> Self {
        self.station_column = column.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row of the file as (station, record).
    fn load(&self) -> Result<Vec<(StationId, RawRecord)>, CsvSourceError> {
        if !self.path.exists() {
            return Err(CsvSourceError::FileNotFound(
                self.path.display().to_string(),
            ));
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let headers = reader.headers()?.clone();

        let station_idx = headers
            .iter()
            .position(|h| h == self.station_column)
            .ok_or_else(|| CsvSourceError::MissingColumn(self.station_column.clone()))?;
        if !headers.iter().any(|h| h == self.timestamp_field) {
            return Err(CsvSourceError::MissingColumn(self.timestamp_field.clone()));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let row = result?;
            let station = match row.get(station_idx).map(str::trim) {
                Some(s) if !s.is_empty() => StationId::from(s),
                _ => continue,
            };

            let mut record = RawRecord::new();
            for (i, header) in headers.iter().enumerate() {
                if i == station_idx {
                    continue;
                }
                if let Some(value) = row.get(i).and_then(parse_cell) {
                    record.insert(header, value);
                }
            }
            rows.push((station, record));
        }

        debug!("read {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    fn station_records(&self, station: &StationId) -> Result<Vec<RawRecord>, SourceError> {
        let rows = self.load()?;
        Ok(rows
            .into_iter()
            .filter(|(s, _)| s == station)
            .map(|(_, record)| record)
            .collect())
    }
}

impl ReadingSource for CsvSource {
    fn fetch(&self, station: &StationId, window: TimeWindow) -> FetchOutcome {
        let result = self.station_records(station).map(|records| {
            records
                .into_iter()
                .filter(|r| {
                    r.get_timestamp(&self.timestamp_field)
                        .is_some_and(|ts| window.contains(ts))
                })
                .collect::<Vec<_>>()
        });
        FetchOutcome::from(result)
    }
}

impl LatestDateLookup for CsvSource {
    fn latest_timestamp(&self, station: &StationId) -> Result<Option<i64>, SourceError> {
        let records = self.station_records(station)?;
        Ok(records
            .iter()
            .filter_map(|r| r.get_timestamp(&self.timestamp_field))
            .max())
    }
}

/// Convert one cell. Empty cells are absent fields; anything that is not a
/// finite number stays a string.
fn parse_cell(cell: &str) -> Option<Value> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Some(Value::from(i));
    }
    match cell.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(Value::from(f)),
        _ => Some(Value::from(cell)),
    }
}

/// Errors reading the CSV file.
#[derive(Debug, thiserror::Error)]
pub enum CsvSourceError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),
}

impl From<CsvSourceError> for SourceError {
    fn from(e: CsvSourceError) -> Self {
        match e {
            CsvSourceError::FileNotFound(_) => SourceError::unavailable(e.to_string()),
            CsvSourceError::Csv(ref inner) if inner.is_io_error() => {
                SourceError::unavailable(e.to_string())
            }
            other => SourceError::InvalidResponse(other.to_string()),
        }
    }
}
