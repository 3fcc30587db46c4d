// Meteo - Daily trend engine for weather-station readings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Reading source abstraction
//!
//! The engine never fetches anything itself. Callers hand it a
//! [`ReadingSource`] (for a day's records) and optionally a
//! [`LatestDateLookup`] (to pick a default day). [`MemorySource`]
//! implements both for tests and local tools.

use crate::error::SourceError;
use crate::reading::{RawRecord, StationId};
use crate::scope::TimeWindow;
use std::collections::HashMap;

/// Result of fetching one scope's records
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// At least one record
    Records(Vec<RawRecord>),
    /// The query succeeded but matched nothing
    Empty,
    /// The query failed
    Failed(SourceError),
}

impl FetchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

impl From<Result<Vec<RawRecord>, SourceError>> for FetchOutcome {
    fn from(result: Result<Vec<RawRecord>, SourceError>) -> Self {
        match result {
            Ok(records) if records.is_empty() => FetchOutcome::Empty,
            Ok(records) => FetchOutcome::Records(records),
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}

/// Supplies raw records for a station over a closed time window
pub trait ReadingSource {
    /// Fetch every record of `station` with a timestamp in `window`
    fn fetch(&self, station: &StationId, window: TimeWindow) -> FetchOutcome;
}

/// Supplies the timestamp of a station's most recent record
pub trait LatestDateLookup {
    /// `Ok(None)` when the station has no record at all
    fn latest_timestamp(&self, station: &StationId) -> Result<Option<i64>, SourceError>;
}

/// In-memory record store, keyed by station
#[derive(Debug, Clone)]
pub struct MemorySource {
    stations: HashMap<StationId, Vec<RawRecord>>,
    timestamp_field: String,
    offline: Option<String>,
}

impl MemorySource {
    /// Create an empty source using the default `timestamp` field
    pub fn new() -> Self {
        Self::with_timestamp_field("timestamp")
    }

    /// Create an empty source filtering on a custom timestamp field
    pub fn with_timestamp_field(field: impl Into<String>) -> Self {
        Self {
            stations: HashMap::new(),
            timestamp_field: field.into(),
            offline: None,
        }
    }

    /// Append a record to a station
    pub fn push(&mut self, station: impl Into<StationId>, record: RawRecord) {
        self.stations.entry(station.into()).or_default().push(record);
    }

    /// Append many records to a station
    pub fn extend<I>(&mut self, station: impl Into<StationId>, records: I)
    where
        I: IntoIterator<Item = RawRecord>,
    {
        self.stations
            .entry(station.into())
            .or_default()
            .extend(records);
    }

    /// Simulate a connectivity failure; every query fails until
    /// [`set_online`](Self::set_online)
    pub fn set_offline(&mut self, reason: impl Into<String>) {
        self.offline = Some(reason.into());
    }

    /// Restore connectivity
    pub fn set_online(&mut self) {
        self.offline = None;
    }

    /// Number of records stored for a station
    pub fn record_count(&self, station: &StationId) -> usize {
        self.stations.get(station).map(Vec::len).unwrap_or(0)
    }

    fn check_online(&self) -> Result<(), SourceError> {
        match &self.offline {
            Some(reason) => Err(SourceError::unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingSource for MemorySource {
    fn fetch(&self, station: &StationId, window: TimeWindow) -> FetchOutcome {
        if let Err(e) = self.check_online() {
            return FetchOutcome::Failed(e);
        }

        // Records without a usable timestamp cannot match a range query.
        let records: Vec<RawRecord> = self
            .stations
            .get(station)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| {
                        r.get_timestamp(&self.timestamp_field)
                            .is_some_and(|ts| window.contains(ts))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        FetchOutcome::from(Ok::<_, SourceError>(records))
    }
}

impl LatestDateLookup for MemorySource {
    fn latest_timestamp(&self, station: &StationId) -> Result<Option<i64>, SourceError> {
        self.check_online()?;
        Ok(self.stations.get(station).and_then(|records| {
            records
                .iter()
                .filter_map(|r| r.get_timestamp(&self.timestamp_field))
                .max()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: i64, temp: f64) -> RawRecord {
        RawRecord::new().with("timestamp", ts).with("temperatura", temp)
    }

    #[test]
    fn test_outcome_from_result() {
        let empty: Result<Vec<RawRecord>, SourceError> = Ok(vec![]);
        assert_eq!(FetchOutcome::from(empty), FetchOutcome::Empty);
        let one: Result<Vec<RawRecord>, SourceError> = Ok(vec![record(0, 1.0)]);
        assert!(matches!(
            FetchOutcome::from(one),
            FetchOutcome::Records(r) if r.len() == 1
        ));
        let failed: Result<Vec<RawRecord>, SourceError> = Err(SourceError::unavailable("down"));
        assert!(FetchOutcome::from(failed).is_failed());
    }

    #[test]
    fn test_fetch_window() {
        let mut source = MemorySource::new();
        source.extend(
            "S",
            vec![record(99, 1.0), record(100, 2.0), record(200, 3.0), record(201, 4.0)],
        );
        source.push("S", RawRecord::new().with("temperatura", 9.0));

        let outcome = source.fetch(&StationId::from("S"), TimeWindow::new(100, 200));
        match outcome {
            FetchOutcome::Records(records) => {
                assert_eq!(records.len(), 2);
                assert_eq!(records[0].get_number("temperatura"), Some(2.0));
            }
            other => panic!("expected records, got {:?}", other),
        }
        assert_eq!(source.record_count(&StationId::from("S")), 5);
    }

    #[test]
    fn test_fetch_empty() {
        let mut source = MemorySource::new();
        source.push("S", record(0, 1.0));

        let window = TimeWindow::new(1000, 2000);
        assert_eq!(source.fetch(&StationId::from("S"), window), FetchOutcome::Empty);
        assert_eq!(source.fetch(&StationId::from("OTHER"), window), FetchOutcome::Empty);
    }

    #[test]
    fn test_offline() {
        let mut source = MemorySource::new();
        source.push("S", record(0, 1.0));
        source.set_offline("no network");

        let station = StationId::from("S");
        assert_eq!(
            source.fetch(&station, TimeWindow::new(0, 10)),
            FetchOutcome::Failed(SourceError::unavailable("no network"))
        );
        assert!(source.latest_timestamp(&station).is_err());

        source.set_online();
        assert!(!source.fetch(&station, TimeWindow::new(0, 10)).is_failed());
    }

    #[test]
    fn test_latest_timestamp() {
        let mut source = MemorySource::new();
        source.extend("S", vec![record(500, 1.0), record(1500, 2.0), record(900, 3.0)]);

        assert_eq!(source.latest_timestamp(&StationId::from("S")), Ok(Some(1500)));
        assert_eq!(source.latest_timestamp(&StationId::from("EMPTY")), Ok(None));
    }

    #[test]
    fn test_custom_timestamp_field() {
        let mut source = MemorySource::with_timestamp_field("ts");
        source.push("S", RawRecord::new().with("ts", 50).with("temperatura", 1.0));

        assert_eq!(source.latest_timestamp(&StationId::from("S")), Ok(Some(50)));
    }
}
