// Meteo - Daily trend engine for weather-station readings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Per-channel views over one scope's aggregated data.
//!
//! The [`ChannelSelector`] validates and buckets once, at construction.
//! Viewing a channel only rebuilds that channel's series and statistics
//! from the cache; it never touches the reading source.

use crate::bucket::BucketGroup;
use crate::error::SourceError;
use crate::reading::{ChannelKind, Reading};
use crate::series::Series;
use crate::stats::{Statistics, StatisticsCalculator};
use crate::validator::ValidatedReadings;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the presentation layer needs for one channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelReport {
    pub channel: ChannelKind,
    pub unit: &'static str,
    pub series: Series,
    pub statistics: Statistics,
}

/// Result of looking at one channel
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelView {
    /// Series and statistics are available
    Ready(ChannelReport),
    /// The scope has no valid reading for this channel
    NoData(ChannelKind),
    /// The reading source failed; there is nothing cached
    FetchFailed(SourceError),
}

impl ChannelView {
    /// The report, if any
    pub fn report(&self) -> Option<&ChannelReport> {
        match self {
            ChannelView::Ready(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ChannelView::Ready(_))
    }
}

/// Cached per-channel data for one scope
#[derive(Debug, Clone)]
struct ChannelCache {
    readings: Vec<Reading>,
    buckets: BucketGroup,
}

/// Per-channel cache of raw readings and bucket groups
#[derive(Debug, Clone)]
pub struct ChannelSelector {
    cache: BTreeMap<ChannelKind, ChannelCache>,
    calculator: StatisticsCalculator,
}

impl ChannelSelector {
    /// Bucket every channel of a validated batch, once.
    pub fn new(validated: ValidatedReadings, calculator: StatisticsCalculator) -> Self {
        let cache = validated
            .into_channels()
            .into_iter()
            .map(|(kind, readings)| {
                let buckets = BucketGroup::from_readings(kind, &readings);
                (kind, ChannelCache { readings, buckets })
            })
            .collect();

        Self { cache, calculator }
    }

    /// Build the series and statistics of one channel from the cache.
    pub fn view(&self, kind: ChannelKind) -> ChannelView {
        let Some(entry) = self.cache.get(&kind) else {
            return ChannelView::NoData(kind);
        };

        let series = Series::build(&entry.buckets);
        match self.calculator.compute(&entry.readings, &series) {
            Some(statistics) => ChannelView::Ready(ChannelReport {
                channel: kind,
                unit: kind.unit(),
                series,
                statistics,
            }),
            None => ChannelView::NoData(kind),
        }
    }

    /// Channels that have data, in display order
    pub fn channels(&self) -> impl Iterator<Item = ChannelKind> + '_ {
        self.cache.keys().copied()
    }

    /// Check if a channel has data
    pub fn has_channel(&self, kind: ChannelKind) -> bool {
        self.cache.contains_key(&kind)
    }

    /// Cached raw readings of a channel
    pub fn readings(&self, kind: ChannelKind) -> &[Reading] {
        self.cache
            .get(&kind)
            .map(|c| c.readings.as_slice())
            .unwrap_or(&[])
    }

    /// Cached bucket group of a channel
    pub fn buckets(&self, kind: ChannelKind) -> Option<&BucketGroup> {
        self.cache.get(&kind).map(|c| &c.buckets)
    }

    /// Reports for every channel with data
    pub fn reports(&self) -> Vec<ChannelReport> {
        self.channels()
            .filter_map(|kind| match self.view(kind) {
                ChannelView::Ready(report) => Some(report),
                _ => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
