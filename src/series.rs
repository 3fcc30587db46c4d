// Meteo - Daily trend engine for weather-station readings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Chart-ready series
//!
//! A [`Series`] holds one averaged point per bucket, strictly ascending by
//! bucket timestamp.

use crate::bucket::BucketGroup;
use crate::reading::ChannelKind;
use crate::stats::ordered_mean;
use serde::{Deserialize, Serialize};

/// One averaged bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Bucket start, epoch seconds
    pub bucket_timestamp: i64,
    /// Mean of the bucket's raw values
    pub average: f64,
}

/// Time-ascending averaged series for one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub channel: ChannelKind,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    /// Build the series for a bucket group.
    ///
    /// Bucket averages sum values in ascending order, so the output is
    /// bit-identical for any insertion order and on every call.
    pub fn build(group: &BucketGroup) -> Self {
        let points = group
            .iter()
            .map(|(bucket_timestamp, values)| SeriesPoint {
                bucket_timestamp,
                average: ordered_mean(values),
            })
            .collect();

        Self {
            channel: group.channel(),
            points,
        }
    }

    /// Earliest point
    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    /// Latest point
    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }

    /// `(x, y)` pairs for plotting
    pub fn to_xy(&self) -> Vec<(i64, f64)> {
        self.points
            .iter()
            .map(|p| (p.bucket_timestamp, p.average))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Reading;

    const T: ChannelKind = ChannelKind::Temperature;

    #[test]
    fn test_build_series() {
        let readings = vec![
            Reading::new(350, T, 24.0),
            Reading::new(0, T, 20.0),
            Reading::new(100, T, 22.0),
        ];
        let group = BucketGroup::from_readings(T, &readings);

        let series = Series::build(&group);
        assert_eq!(series.channel, T);
        assert_eq!(series.to_xy(), vec![(0, 21.0), (300, 24.0)]);
        assert_eq!(series.first().unwrap().average, 21.0);
        assert_eq!(series.last().unwrap().bucket_timestamp, 300);
    }

    #[test]
    fn test_series_strictly_ascending() {
        let readings: Vec<_> = (0..50)
            .rev()
            .map(|i| Reading::new(i * 137, T, i as f64))
            .collect();
        let series = Series::build(&BucketGroup::from_readings(T, &readings));

        assert!(series
            .points
            .windows(2)
            .all(|w| w[0].bucket_timestamp < w[1].bucket_timestamp));
        assert!(series.iter().all(|p| p.bucket_timestamp % 300 == 0));
    }

    #[test]
    fn test_build_idempotent() {
        let readings = vec![
            Reading::new(1, T, 0.1),
            Reading::new(2, T, 0.2),
            Reading::new(3, T, 0.3),
            Reading::new(900, T, 1.0 / 3.0),
        ];
        let group = BucketGroup::from_readings(T, &readings);

        let a = Series::build(&group);
        let b = Series::build(&group);
        let bits = |s: &Series| s.iter().map(|p| p.average.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_group() {
        let series = Series::build(&BucketGroup::new(T));
        assert!(series.is_empty());
        assert!(series.first().is_none());
    }

    #[test]
    fn test_series_json() {
        let group = BucketGroup::from_readings(T, &[Reading::new(600, T, 18.5)]);
        let json = serde_json::to_value(Series::build(&group)).unwrap();
        assert_eq!(json["channel"], "temperature");
        assert_eq!(json["points"][0]["bucket_timestamp"], 600);
        assert_eq!(json["points"][0]["average"], 18.5);
    }
}
