// Meteo - Daily trend engine for weather-station readings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Meteo - Daily trend engine for weather-station readings
//!
//! Turns one day of irregularly-sampled station records into, per channel:
//!
//! - a 5-minute averaged series, ascending by time, ready to plot
//! - a statistics summary: max, min, mean, amplitude, trend and count
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use meteo::{ChannelKind, Engine, EngineConfig, MemorySource, QueryScope, RawRecord, Session};
//!
//! let mut source = MemorySource::new();
//! source.extend("STATION_00", vec![
//!     RawRecord::new().with("timestamp", 1_710_028_800i64).with("temperatura", 20.0),
//!     RawRecord::new().with("timestamp", 1_710_028_900i64).with("temperatura", 22.0),
//!     RawRecord::new().with("timestamp", 1_710_029_150i64).with("temperatura", 24.0),
//! ]);
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
//! let mut session = Session::open(&engine, &source, QueryScope::new("STATION_00", day)).unwrap();
//!
//! let view = session.select(ChannelKind::Temperature);
//! let report = view.report().unwrap();
//! assert_eq!(report.series.len(), 2);
//! assert_eq!(report.statistics.mean, 22.0);
//! assert_eq!(report.statistics.trend.magnitude, 3.0);
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! RawRecord ─▶ Validator ─▶ BucketGroup (per channel) ─┬▶ Series ──────▶ chart
//!                                   ▲                  └▶ Statistics ──▶ summary
//!                                   └── ChannelSelector cache (one per scope)
//! ```
//!
//! ## Modules
//!
//! - [`reading`]: channels, raw records and validated readings
//! - [`validator`]: raw record filtering
//! - [`bucket`]: 5-minute bucketing
//! - [`series`]: averaged, ascending series
//! - [`stats`]: statistics and trend
//! - [`selector`]: per-channel cached views
//! - [`source`]: reading source traits
//! - [`scope`]: station/day scopes and time windows
//! - [`engine`]: engine and session
//! - [`config`]: engine configuration

pub mod bucket;
pub mod config;
pub mod engine;
pub mod error;
pub mod reading;
pub mod scope;
pub mod selector;
pub mod series;
pub mod source;
pub mod stats;
pub mod validator;

// Re-exports for convenient access
pub use bucket::{bucket_key, checked_bucket_key, Aggregator, BucketGroup, BUCKET_WIDTH_SECS};
pub use config::{EngineConfig, FieldKeys, TrendBasis};
pub use engine::{Engine, QueryOutcome, Session};
pub use error::{ConfigError, MeteoError, Result, SourceError};
pub use reading::{ChannelKind, RawRecord, Reading, StationId};
pub use scope::{day_of, QueryScope, TimeWindow};
pub use selector::{ChannelReport, ChannelSelector, ChannelView};
pub use series::{Series, SeriesPoint};
pub use source::{FetchOutcome, LatestDateLookup, MemorySource, ReadingSource};
pub use stats::{Statistics, StatisticsCalculator, Trend, TrendDirection};
pub use validator::{ValidatedReadings, Validator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
