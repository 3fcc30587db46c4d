// Meteo - Daily trend engine for weather-station readings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Time bucketing.
//!
//! Readings are grouped into fixed 5-minute windows keyed by the window's
//! start (epoch seconds). Grouping is a single linear pass; ordering is left
//! to the series builder.

use crate::reading::{ChannelKind, Reading};
use std::collections::BTreeMap;

/// Bucket width in seconds (5 minutes)
pub const BUCKET_WIDTH_SECS: i64 = 300;

/// Start of the bucket containing `timestamp`.
///
/// A multiple of [`BUCKET_WIDTH_SECS`], at or below `timestamp`.
/// Timestamps in the first partial bucket above `i64::MIN` have no
/// representable key and saturate to `i64::MIN`; the validator discards
/// them, see [`checked_bucket_key`].
pub fn bucket_key(timestamp: i64) -> i64 {
    timestamp
        .div_euclid(BUCKET_WIDTH_SECS)
        .saturating_mul(BUCKET_WIDTH_SECS)
}

/// Start of the bucket containing `timestamp`, or `None` when it does not
/// fit in an `i64`.
pub fn checked_bucket_key(timestamp: i64) -> Option<i64> {
    timestamp
        .div_euclid(BUCKET_WIDTH_SECS)
        .checked_mul(BUCKET_WIDTH_SECS)
}

/// Raw values of one channel, grouped by bucket key.
///
/// Equality compares each bucket as a multiset, so two groups built from
/// the same readings in different orders are equal.
#[derive(Debug, Clone)]
pub struct BucketGroup {
    channel: ChannelKind,
    buckets: BTreeMap<i64, Vec<f64>>,
}

impl BucketGroup {
    /// Create an empty group
    pub fn new(channel: ChannelKind) -> Self {
        Self {
            channel,
            buckets: BTreeMap::new(),
        }
    }

    /// Group a channel's readings.
    ///
    /// Readings tagged with another channel are ignored.
    pub fn from_readings(channel: ChannelKind, readings: &[Reading]) -> Self {
        let mut group = Self::new(channel);
        for reading in readings.iter().filter(|r| r.channel == channel) {
            group.push(reading.timestamp, reading.value);
        }
        group
    }

    /// Add one value
    pub fn push(&mut self, timestamp: i64, value: f64) {
        self.buckets
            .entry(bucket_key(timestamp))
            .or_default()
            .push(value);
    }

    /// Channel of the grouped values
    pub fn channel(&self) -> ChannelKind {
        self.channel
    }

    /// Values in the bucket starting at `key`
    pub fn get(&self, key: i64) -> Option<&[f64]> {
        self.buckets.get(&key).map(Vec::as_slice)
    }

    /// Buckets in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (i64, &[f64])> {
        self.buckets.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Bucket keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = i64> + '_ {
        self.buckets.keys().copied()
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if no value was grouped
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of grouped values across all buckets
    pub fn value_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

impl PartialEq for BucketGroup {
    fn eq(&self, other: &Self) -> bool {
        self.channel == other.channel
            && self.buckets.len() == other.buckets.len()
            && self
                .buckets
                .iter()
                .zip(other.buckets.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && sorted(va) == sorted(vb))
    }
}

fn sorted(values: &[f64]) -> Vec<u64> {
    let mut copy = values.to_vec();
    copy.sort_by(f64::total_cmp);
    copy.into_iter().map(f64::to_bits).collect()
}

/// Groups per-channel readings into buckets
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// Bucket one channel's readings
    pub fn aggregate(&self, channel: ChannelKind, readings: &[Reading]) -> BucketGroup {
        BucketGroup::from_readings(channel, readings)
    }
}
