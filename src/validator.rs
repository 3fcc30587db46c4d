// Meteo - Daily trend engine for weather-station readings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Reading validation
//!
//! Turns untyped [`RawRecord`]s into channel-partitioned [`Reading`]s.
//! Nothing here fails: a record without a usable timestamp is dropped whole, a
//! missing or non-numeric channel field only drops that channel's value.

use crate::bucket::checked_bucket_key;
use crate::config::FieldKeys;
use crate::reading::{ChannelKind, RawRecord, Reading};
use std::collections::BTreeMap;

/// Validated readings, one list per channel that produced at least one value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedReadings {
    channels: BTreeMap<ChannelKind, Vec<Reading>>,
    /// Records inspected
    pub records_seen: usize,
    /// Records that contributed no reading at all
    pub records_discarded: usize,
    /// Channel fields present in a kept record but not usable as numbers
    pub values_dropped: usize,
}

impl ValidatedReadings {
    /// Readings for one channel (empty slice if none)
    pub fn readings(&self, kind: ChannelKind) -> &[Reading] {
        self.channels.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Channels with at least one reading, in display order
    pub fn channels(&self) -> impl Iterator<Item = ChannelKind> + '_ {
        self.channels.keys().copied()
    }

    /// Total readings across channels
    pub fn total(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }

    /// Check if no channel produced a reading
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Take ownership of the per-channel lists
    pub fn into_channels(self) -> BTreeMap<ChannelKind, Vec<Reading>> {
        self.channels
    }
}

/// Validates raw records against a set of field keys
#[derive(Debug, Clone, Default)]
pub struct Validator {
    fields: FieldKeys,
}

impl Validator {
    /// Create a validator with the given field keys
    pub fn new(fields: FieldKeys) -> Self {
        Self { fields }
    }

    /// Field keys in use
    pub fn fields(&self) -> &FieldKeys {
        &self.fields
    }

    /// Validate a batch of records
    pub fn validate<'a, I>(&self, records: I) -> ValidatedReadings
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let mut out = ValidatedReadings::default();

        for record in records {
            out.records_seen += 1;

            // A timestamp with no representable bucket is as good as missing.
            let timestamp = record
                .get_timestamp(&self.fields.timestamp)
                .filter(|&ts| checked_bucket_key(ts).is_some());
            let Some(timestamp) = timestamp else {
                out.records_discarded += 1;
                continue;
            };

            let mut kept = 0;
            let mut dropped = 0;
            for kind in ChannelKind::ALL {
                let key = self.fields.channel(kind);
                match record.get_number(key) {
                    Some(value) => {
                        out.channels
                            .entry(kind)
                            .or_default()
                            .push(Reading::new(timestamp, kind, value));
                        kept += 1;
                    }
                    None if record.get(key).is_some() => dropped += 1,
                    None => {}
                }
            }

            if kept == 0 {
                out.records_discarded += 1;
            } else {
                out.values_dropped += dropped;
            }
        }

        log::debug!(
            "validated {} records: {} readings, {} records discarded, {} values dropped",
            out.records_seen,
            out.total(),
            out.records_discarded,
            out.values_dropped
        );

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new(FieldKeys::default())
    }

    #[test]
    fn test_full_record() {
        let records = vec![RawRecord::new()
            .with("timestamp", 600)
            .with("temperatura", 20.5)
            .with("humidade", 55.0)
            .with("pm25", 12.0)];

        let out = validator().validate(&records);
        assert_eq!(out.records_seen, 1);
        assert_eq!(out.records_discarded, 0);
        assert_eq!(out.total(), 3);
        assert_eq!(
            out.readings(ChannelKind::Temperature),
            &[Reading::new(600, ChannelKind::Temperature, 20.5)]
        );
        assert_eq!(out.channels().collect::<Vec<_>>(), ChannelKind::ALL.to_vec());
    }

    #[test]
    fn test_missing_timestamp_discards_record() {
        let records = vec![
            RawRecord::new().with("temperatura", 20.5),
            RawRecord::new().with("timestamp", "yesterday").with("temperatura", 21.0),
        ];

        let out = validator().validate(&records);
        assert!(out.is_empty());
        assert_eq!(out.records_discarded, 2);
    }

    #[test]
    fn test_partial_channels() {
        let records = vec![
            RawRecord::new().with("timestamp", 0).with("temperatura", 20.0),
            RawRecord::new().with("timestamp", 10).with("humidade", 40.0),
            RawRecord::new()
                .with("timestamp", 20)
                .with("temperatura", "hot")
                .with("humidade", 41.0),
        ];

        let out = validator().validate(&records);
        assert_eq!(out.readings(ChannelKind::Temperature).len(), 1);
        assert_eq!(out.readings(ChannelKind::Humidity).len(), 2);
        assert!(out.readings(ChannelKind::Particulate).is_empty());
        assert_eq!(out.values_dropped, 1);
        assert_eq!(out.records_discarded, 0);
    }

    #[test]
    fn test_extreme_timestamps() {
        let records = vec![
            RawRecord::new().with("timestamp", i64::MIN).with("temperatura", 20.0),
            RawRecord::new().with("timestamp", -9.3e18).with("temperatura", 21.0),
            RawRecord::new().with("timestamp", 9.3e18).with("temperatura", 22.0),
            RawRecord::new().with("timestamp", i64::MIN as f64).with("temperatura", 23.0),
        ];
        let out = validator().validate(&records);
        assert!(out.is_empty());
        assert_eq!(out.records_seen, 4);
        assert_eq!(out.records_discarded, 4);
    }

    #[test]
    fn test_max_timestamp_kept() {
        // The last bucket below i64::MAX is representable.
        let records = vec![RawRecord::new()
            .with("timestamp", i64::MAX)
            .with("temperatura", 20.0)];
        let out = validator().validate(&records);
        assert_eq!(out.records_discarded, 0);
        assert_eq!(out.readings(ChannelKind::Temperature)[0].timestamp, i64::MAX);
    }

    #[test]
    fn test_record_without_channels() {
        let records = vec![RawRecord::new().with("timestamp", 5).with("battery", 3.7)];

        let out = validator().validate(&records);
        assert!(out.is_empty());
        assert_eq!(out.records_discarded, 1);
    }

    #[test]
    fn test_custom_field_keys() {
        let fields = FieldKeys {
            timestamp: "ts".to_string(),
            temperature: "temp_c".to_string(),
            ..FieldKeys::default()
        };
        let records = vec![
            RawRecord::new().with("ts", 1).with("temp_c", 18.0),
            RawRecord::new().with("timestamp", 2).with("temperatura", 19.0),
        ];

        let out = Validator::new(fields).validate(&records);
        assert_eq!(out.total(), 1);
        assert_eq!(out.readings(ChannelKind::Temperature)[0].value, 18.0);
    }

    #[test]
    fn test_empty_input() {
        let out = validator().validate(&Vec::<RawRecord>::new());
        assert!(out.is_empty());
        assert_eq!(out.records_seen, 0);
    }
}
