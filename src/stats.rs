// Meteo - Daily trend engine for weather-station readings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Descriptive statistics for one channel's day.
//!
//! Extremes, mean and count come from the raw readings, so a short spike
//! still shows in `max` even when the 5-minute average smooths it out. The
//! trend compares two endpoints chosen by [`TrendBasis`]:
//!
//! - `BucketAverage`: first vs. last point of the series
//! - `FirstLastReading`: earliest vs. latest raw reading
//!
//! Formatting (decimals, units) belongs to the presentation layer.

use crate::config::TrendBasis;
use crate::reading::Reading;
use crate::series::Series;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Direction of the day's trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
            TrendDirection::Flat => write!(f, "flat"),
        }
    }
}

/// Signed change between the day's endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// `last - first`
    pub magnitude: f64,
}

impl Trend {
    /// No change
    pub fn flat() -> Self {
        Self {
            direction: TrendDirection::Flat,
            magnitude: 0.0,
        }
    }

    /// Trend from `first` to `last`. Exact comparison, no tolerance.
    pub fn between(first: f64, last: f64) -> Self {
        let magnitude = last - first;
        let direction = if magnitude > 0.0 {
            TrendDirection::Up
        } else if magnitude < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        };
        Self {
            direction,
            magnitude,
        }
    }

    /// Trend over an ascending series; flat when it has no point
    pub fn from_series(series: &Series) -> Self {
        match (series.first(), series.last()) {
            (Some(first), Some(last)) => Self::between(first.average, last.average),
            _ => Self::flat(),
        }
    }

    /// Trend between the earliest and latest reading.
    ///
    /// Readings sharing a timestamp are ordered by value so the choice does
    /// not depend on input order.
    pub fn from_readings(readings: &[Reading]) -> Self {
        let first = readings.iter().min_by(|a, b| chronological(a, b));
        let last = readings.iter().max_by(|a, b| chronological(a, b));
        match (first, last) {
            (Some(first), Some(last)) => Self::between(first.value, last.value),
            _ => Self::flat(),
        }
    }
}

fn chronological(a: &Reading, b: &Reading) -> Ordering {
    a.timestamp
        .cmp(&b.timestamp)
        .then_with(|| a.value.total_cmp(&b.value))
}

/// Summary of one channel for one scope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    /// `max - min`
    pub amplitude: f64,
    pub trend: Trend,
    /// Number of raw readings (not buckets)
    pub count: usize,
}

/// Computes [`Statistics`] from raw readings and their series
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsCalculator {
    basis: TrendBasis,
}

impl StatisticsCalculator {
    pub fn new(basis: TrendBasis) -> Self {
        Self { basis }
    }

    pub fn basis(&self) -> TrendBasis {
        self.basis
    }

    /// Summarize a channel.
    ///
    /// Returns `None` when there are no readings: absence is explicit, never
    /// zero-filled.
    pub fn compute(&self, readings: &[Reading], series: &Series) -> Option<Statistics> {
        if readings.is_empty() {
            return None;
        }

        let values: Vec<f64> = readings.iter().map(|r| r.value).collect();
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);

        let trend = match self.basis {
            TrendBasis::BucketAverage => Trend::from_series(series),
            TrendBasis::FirstLastReading => Trend::from_readings(readings),
        };

        Some(Statistics {
            max,
            min,
            mean: ordered_mean(&values),
            amplitude: max - min,
            trend,
            count: values.len(),
        })
    }
}

/// Arithmetic mean, summed in ascending `total_cmp` order.
///
/// Floating-point addition is not associative; a fixed summation order makes
/// the mean independent of how the values were collected. When the plain sum
/// overflows, the values are pre-divided by the count instead. Returns NaN
/// for an empty slice.
pub(crate) fn ordered_mean(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;

    let sum: f64 = sorted.iter().sum();
    if sum.is_finite() {
        sum / n
    } else {
        sorted.iter().map(|v| v / n).sum()
    }
}
