// Meteo - Daily trend engine for weather-station readings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Query scopes: one station, one local calendar day.

use crate::error::ConfigError;
use crate::reading::StationId;
use chrono::{FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed interval of epoch seconds `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// 00:00:00 to 23:59:59 of `day`, local to the given UTC offset
    pub fn for_day(day: NaiveDate, utc_offset_minutes: i32) -> Result<Self, ConfigError> {
        let offset = fixed_offset(utc_offset_minutes)?;
        let bound = |h, m, s| {
            day.and_hms_opt(h, m, s)
                .and_then(|naive| offset.from_local_datetime(&naive).single())
                .map(|dt| dt.timestamp())
        };

        match (bound(0, 0, 0), bound(23, 59, 59)) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(ConfigError::InvalidUtcOffset {
                minutes: utc_offset_minutes,
            }),
        }
    }

    /// Check if `timestamp` lies in the window (both ends included)
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

/// The (station, day) pair bounding one aggregation run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryScope {
    pub station: StationId,
    pub day: NaiveDate,
}

impl QueryScope {
    pub fn new(station: impl Into<StationId>, day: NaiveDate) -> Self {
        Self {
            station: station.into(),
            day,
        }
    }

    /// The scope's time window
    pub fn window(&self, utc_offset_minutes: i32) -> Result<TimeWindow, ConfigError> {
        TimeWindow::for_day(self.day, utc_offset_minutes)
    }
}

impl fmt::Display for QueryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.station, self.day)
    }
}

/// Local calendar day of an epoch timestamp
pub fn day_of(timestamp: i64, utc_offset_minutes: i32) -> Option<NaiveDate> {
    let offset = fixed_offset(utc_offset_minutes).ok()?;
    offset
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.date_naive())
}

fn fixed_offset(utc_offset_minutes: i32) -> Result<FixedOffset, ConfigError> {
    utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or(ConfigError::InvalidUtcOffset {
            minutes: utc_offset_minutes,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_utc() {
        // 2024-03-10T00:00:00Z
        let window = TimeWindow::for_day(date(2024, 3, 10), 0).unwrap();
        assert_eq!(window.start, 1_710_028_800);
        assert_eq!(window.end, 1_710_028_800 + 86_399);
        assert!(window.contains(window.start));
        assert!(window.contains(window.end));
        assert!(!window.contains(window.end + 1));
    }

    #[test]
    fn test_window_with_offset() {
        let utc = TimeWindow::for_day(date(2024, 3, 10), 0).unwrap();
        let lisbon_summer = TimeWindow::for_day(date(2024, 3, 10), 60).unwrap();
        assert_eq!(lisbon_summer.start, utc.start - 3600);

        let west = TimeWindow::for_day(date(2024, 3, 10), -300).unwrap();
        assert_eq!(west.start, utc.start + 5 * 3600);
    }

    #[test]
    fn test_invalid_offset() {
        assert!(TimeWindow::for_day(date(2024, 3, 10), 24 * 60).is_err());
        assert!(day_of(0, -24 * 60).is_none());
        assert!(TimeWindow::for_day(date(2024, 3, 10), i32::MIN).is_err());
        assert!(day_of(0, i32::MAX).is_none());
    }

    #[test]
    fn test_day_of() {
        assert_eq!(day_of(1_710_028_800, 0), Some(date(2024, 3, 10)));
        assert_eq!(day_of(1_710_028_799, 0), Some(date(2024, 3, 9)));
        assert_eq!(day_of(1_710_028_799, 60), Some(date(2024, 3, 10)));
    }

    #[test]
    fn test_scope_window_matches_day() {
        let scope = QueryScope::new("STATION_00", date(2023, 12, 31));
        let window = scope.window(120).unwrap();
        assert_eq!(day_of(window.start, 120), Some(scope.day));
        assert_eq!(day_of(window.end, 120), Some(scope.day));
        assert_eq!(scope.to_string(), "STATION_00 @ 2023-12-31");
    }
}
