// Meteo - Daily trend engine for weather-station readings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config:
//!
//! ```rust
//! use meteo::config::{EngineConfig, TrendBasis};
//!
//! let config = EngineConfig::from_json(r#"{ "utc_offset_minutes": 60 }"#).unwrap();
//! assert_eq!(config.utc_offset_minutes, 60);
//! assert_eq!(config.trend_basis, TrendBasis::BucketAverage);
//! ```

use crate::error::ConfigError;
use crate::reading::{ChannelKind, StationId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Largest accepted UTC offset, in minutes (exclusive)
const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60;

/// Master configuration for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How the trend is derived.
    pub trend_basis: TrendBasis,

    /// Offset of the station's local day from UTC (minutes east).
    pub utc_offset_minutes: i32,

    /// Record field keys.
    pub fields: FieldKeys,

    /// Known stations; the first one is the default.
    pub stations: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trend_basis: TrendBasis::default(),
            utc_offset_minutes: 0,
            fields: FieldKeys::default(),
            stations: vec!["STATION_00".to_string(), "STATION_01".to_string()],
        }
    }
}

/// Which readings the trend compares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendBasis {
    /// First vs. last bucket average of the series.
    #[default]
    BucketAverage,
    /// Earliest vs. latest raw reading.
    FirstLastReading,
}

/// Record field keys for the timestamp and each channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldKeys {
    pub timestamp: String,
    pub temperature: String,
    pub humidity: String,
    pub particulate: String,
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            timestamp: "timestamp".to_string(),
            temperature: ChannelKind::Temperature.default_field().to_string(),
            humidity: ChannelKind::Humidity.default_field().to_string(),
            particulate: ChannelKind::Particulate.default_field().to_string(),
        }
    }
}

impl FieldKeys {
    /// Field key carrying the given channel's value
    pub fn channel(&self, kind: ChannelKind) -> &str {
        match kind {
            ChannelKind::Temperature => &self.temperature,
            ChannelKind::Humidity => &self.humidity,
            ChannelKind::Particulate => &self.particulate,
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        let roles = std::iter::once(("timestamp", self.timestamp.as_str())).chain(
            ChannelKind::ALL
                .iter()
                .map(|kind| (kind.as_str(), self.channel(*kind))),
        );

        for (role, key) in roles {
            if key.trim().is_empty() {
                return Err(ConfigError::EmptyFieldKey(role.to_string()));
            }
            if !seen.insert(key) {
                return Err(ConfigError::DuplicateFieldKey(key.to_string()));
            }
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.utc_offset_minutes.unsigned_abs() >= MAX_UTC_OFFSET_MINUTES.unsigned_abs() {
            return Err(ConfigError::InvalidUtcOffset {
                minutes: self.utc_offset_minutes,
            });
        }
        if self.stations.is_empty() {
            return Err(ConfigError::NoStations);
        }
        self.fields.check()
    }

    /// First station of the catalog.
    pub fn default_station(&self) -> Option<StationId> {
        self.stations.first().map(|s| StationId::new(s.as_str()))
    }

    /// Builder: set trend basis.
    pub fn with_trend_basis(mut self, basis: TrendBasis) -> Self {
        self.trend_basis = basis;
        self
    }

    /// Builder: set UTC offset.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }
}
