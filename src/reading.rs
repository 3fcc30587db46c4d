// Meteo - Daily trend engine for weather-station readings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Core data types
//!
//! - [`RawRecord`]: one untyped document as delivered by a reading source
//! - [`ChannelKind`]: the closed set of measurement channels
//! - [`Reading`]: one validated, channel-tagged sample
//! - [`StationId`]: identifier of a weather station

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Measurement channel of a weather station
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Air temperature
    Temperature,
    /// Relative humidity
    Humidity,
    /// Particulate matter concentration
    Particulate,
}

impl ChannelKind {
    /// All channels, in display order
    pub const ALL: [ChannelKind; 3] = [
        ChannelKind::Temperature,
        ChannelKind::Humidity,
        ChannelKind::Particulate,
    ];

    /// Display unit of the channel's values
    pub fn unit(&self) -> &'static str {
        match self {
            ChannelKind::Temperature => "°C",
            ChannelKind::Humidity => "%",
            ChannelKind::Particulate => "µg/m³",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ChannelKind::Temperature => "Temperature",
            ChannelKind::Humidity => "Humidity",
            ChannelKind::Particulate => "Particulate",
        }
    }

    /// Record field key used by the station firmware
    pub fn default_field(&self) -> &'static str {
        match self {
            ChannelKind::Temperature => "temperatura",
            ChannelKind::Humidity => "humidade",
            ChannelKind::Particulate => "pm25",
        }
    }

    /// Stable lowercase name (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Temperature => "temperature",
            ChannelKind::Humidity => "humidity",
            ChannelKind::Particulate => "particulate",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "temperature" | "temp" => Ok(ChannelKind::Temperature),
            "humidity" | "humid" => Ok(ChannelKind::Humidity),
            "particulate" | "pm" | "pm25" => Ok(ChannelKind::Particulate),
            other => Err(format!("unknown channel: {}", other)),
        }
    }
}

/// A validated sample: immutable once produced by the validator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Epoch seconds
    pub timestamp: i64,
    /// Channel the value belongs to
    pub channel: ChannelKind,
    /// Measured value, always finite
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: i64, channel: ChannelKind, value: f64) -> Self {
        Self {
            timestamp,
            channel,
            value,
        }
    }
}

/// An untyped record as delivered by a reading source.
///
/// Every field is optional; the validator decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a record from a JSON object
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Builder: set a field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set a field, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Raw field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field as whole epoch seconds.
    ///
    /// Integers are taken as-is; finite floats are floored.
    pub fn get_timestamp(&self, key: &str) -> Option<i64> {
        let value = self.fields.get(key)?;
        if let Some(ts) = value.as_i64() {
            return Some(ts);
        }
        let ts = value.as_f64()?;
        if ts.is_finite() && ts >= i64::MIN as f64 && ts < i64::MAX as f64 {
            Some(ts.floor() as i64)
        } else {
            None
        }
    }

    /// Field as a finite number
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.fields
            .get(key)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Identifier of a weather station
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_units() {
        assert_eq!(ChannelKind::Temperature.unit(), "°C");
        assert_eq!(ChannelKind::Humidity.unit(), "%");
        assert_eq!(ChannelKind::Particulate.unit(), "µg/m³");
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("Temperature".parse::<ChannelKind>(), Ok(ChannelKind::Temperature));
        assert_eq!("pm25".parse::<ChannelKind>(), Ok(ChannelKind::Particulate));
        assert!("pressure".parse::<ChannelKind>().is_err());
    }

    #[test]
    fn test_channel_serde_name() {
        let json = serde_json::to_string(&ChannelKind::Humidity).unwrap();
        assert_eq!(json, "\"humidity\"");
        for kind in ChannelKind::ALL {
            assert_eq!(json_name(kind), kind.as_str());
        }
    }

    fn json_name(kind: ChannelKind) -> String {
        serde_json::to_value(kind)
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_record_timestamp() {
        let record = RawRecord::new()
            .with("a", 1_700_000_000i64)
            .with("b", 299.9)
            .with("c", "1700000000")
            .with("d", json!(null));

        assert_eq!(record.get_timestamp("a"), Some(1_700_000_000));
        assert_eq!(record.get_timestamp("b"), Some(299));
        assert_eq!(record.get_timestamp("c"), None);
        assert_eq!(record.get_timestamp("d"), None);
        assert_eq!(record.get_timestamp("missing"), None);
    }

    #[test]
    fn test_record_number() {
        let record = RawRecord::new()
            .with("temperatura", 21.5)
            .with("humidade", 60)
            .with("pm25", "n/a")
            .with("flag", true);

        assert_eq!(record.get_number("temperatura"), Some(21.5));
        assert_eq!(record.get_number("humidade"), Some(60.0));
        assert_eq!(record.get_number("pm25"), None);
        assert_eq!(record.get_number("flag"), None);
    }

    #[test]
    fn test_record_from_json() {
        let record = RawRecord::from_json(r#"{"timestamp": 300, "temperatura": 19.25}"#).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get_timestamp("timestamp"), Some(300));
        assert_eq!(record.get_number("temperatura"), Some(19.25));
    }

    #[test]
    fn test_station_id() {
        let id = StationId::from("STATION_00");
        assert_eq!(id.as_str(), "STATION_00");
        assert_eq!(id.to_string(), "STATION_00");
    }
}
