// Meteo - Daily trend engine for weather-station readings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Error types for Meteo
//!
//! Malformed records are never errors: the validator drops them silently.
//! The only failures that reach a caller are a reading source that could
//! not be queried and a configuration that does not make sense.

use thiserror::Error;

/// Result type alias for Meteo operations
pub type Result<T> = std::result::Result<T, MeteoError>;

/// Main error type for Meteo operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeteoError {
    /// Reading source error
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Failures reported by a reading source or latest-date lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The backing store could not be reached
    #[error("Source unavailable: {reason}")]
    Unavailable { reason: String },

    /// The query did not complete in time
    #[error("Query timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The backing store answered with something unreadable
    #[error("Invalid response from source: {0}")]
    InvalidResponse(String),
}

impl SourceError {
    /// Shorthand for [`SourceError::Unavailable`]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Errors in an [`EngineConfig`](crate::config::EngineConfig)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// UTC offset outside of +/- 24h
    #[error("UTC offset out of range: {minutes} minutes")]
    InvalidUtcOffset { minutes: i32 },

    /// A record field key is empty
    #[error("Empty field key for {0}")]
    EmptyFieldKey(String),

    /// Two roles share the same record field key
    #[error("Field key '{0}' is used more than once")]
    DuplicateFieldKey(String),

    /// Station catalog is empty
    #[error("Station catalog is empty")]
    NoStations,

    /// Config file could not be read
    #[error("Cannot read config file: {0}")]
    Io(String),

    /// Config file is not valid JSON for this schema
    #[error("Cannot parse config: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeteoError::Source(SourceError::Timeout { timeout_ms: 5000 });
        assert_eq!(err.to_string(), "Source error: Query timed out after 5000ms");
    }

    #[test]
    fn test_error_conversion() {
        let err: MeteoError = ConfigError::NoStations.into();
        assert!(matches!(err, MeteoError::Config(ConfigError::NoStations)));

        let err: MeteoError = SourceError::unavailable("offline").into();
        assert_eq!(err.to_string(), "Source error: Source unavailable: offline");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidUtcOffset { minutes: 1500 };
        assert!(err.to_string().contains("1500"));

        let err = ConfigError::DuplicateFieldKey("timestamp".to_string());
        assert_eq!(err.to_string(), "Field key 'timestamp' is used more than once");
    }
}
