// Meteo - Daily trend engine for weather-station readings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Pipeline orchestration
//!
//! [`Engine`] runs validate -> bucket once per scope and hands back a
//! [`QueryOutcome`]. [`Session`] keeps the outcome of the current scope and
//! the active channel; switching channels reuses the cache, changing scope
//! throws it away.

use crate::config::EngineConfig;
use crate::error::{Result, SourceError};
use crate::reading::{ChannelKind, RawRecord, StationId};
use crate::scope::{day_of, QueryScope};
use crate::selector::{ChannelSelector, ChannelView};
use crate::source::{FetchOutcome, LatestDateLookup, ReadingSource};
use crate::stats::StatisticsCalculator;
use crate::validator::Validator;
use chrono::NaiveDate;

/// Outcome of one aggregation run
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// At least one channel has data
    Ready(ChannelSelector),
    /// The source answered, but nothing valid was in the scope
    NoData,
    /// The source could not be queried
    FetchFailed(SourceError),
}

impl QueryOutcome {
    /// View one channel; failures and empty scopes map to their own variants
    pub fn view(&self, kind: ChannelKind) -> ChannelView {
        match self {
            QueryOutcome::Ready(selector) => selector.view(kind),
            QueryOutcome::NoData => ChannelView::NoData(kind),
            QueryOutcome::FetchFailed(e) => ChannelView::FetchFailed(e.clone()),
        }
    }

    pub fn selector(&self) -> Option<&ChannelSelector> {
        match self {
            QueryOutcome::Ready(selector) => Some(selector),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, QueryOutcome::Ready(_))
    }
}

/// The aggregation engine. Stateless between runs.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    validator: Validator,
    calculator: StatisticsCalculator,
}

impl Engine {
    /// Create an engine from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            validator: Validator::new(config.fields.clone()),
            calculator: StatisticsCalculator::new(config.trend_basis),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate and bucket an already-fetched batch
    pub fn ingest(&self, records: &[RawRecord]) -> QueryOutcome {
        let validated = self.validator.validate(records);
        if validated.is_empty() {
            return QueryOutcome::NoData;
        }
        QueryOutcome::Ready(ChannelSelector::new(validated, self.calculator))
    }

    /// Fetch a scope's records and aggregate them
    pub fn run<S>(&self, source: &S, scope: &QueryScope) -> Result<QueryOutcome>
    where
        S: ReadingSource + ?Sized,
    {
        let window = scope.window(self.config.utc_offset_minutes)?;
        log::debug!(
            "fetching {} [{}, {}]",
            scope,
            window.start,
            window.end
        );

        let outcome = match source.fetch(&scope.station, window) {
            FetchOutcome::Records(records) => self.ingest(&records),
            FetchOutcome::Empty => QueryOutcome::NoData,
            FetchOutcome::Failed(e) => {
                log::warn!("fetch failed for {}: {}", scope, e);
                QueryOutcome::FetchFailed(e)
            }
        };

        if let QueryOutcome::NoData = outcome {
            log::debug!("no data for {}", scope);
        }
        Ok(outcome)
    }

    /// Day of the station's latest record, or `today` when there is none
    /// or the lookup fails.
    pub fn default_day<L>(&self, lookup: &L, station: &StationId, today: NaiveDate) -> NaiveDate
    where
        L: LatestDateLookup + ?Sized,
    {
        match lookup.latest_timestamp(station) {
            Ok(Some(ts)) => day_of(ts, self.config.utc_offset_minutes).unwrap_or(today),
            Ok(None) => {
                log::warn!("station {} has no records, using {}", station, today);
                today
            }
            Err(e) => {
                log::warn!("latest-date lookup failed for {}: {}, using {}", station, e, today);
                today
            }
        }
    }
}

/// One scope's cached outcome plus the active channel
#[derive(Debug, Clone)]
pub struct Session {
    scope: QueryScope,
    outcome: QueryOutcome,
    active: ChannelKind,
}

impl Session {
    /// Run the pipeline for `scope`
    pub fn open<S>(engine: &Engine, source: &S, scope: QueryScope) -> Result<Self>
    where
        S: ReadingSource + ?Sized,
    {
        let outcome = engine.run(source, &scope)?;
        Ok(Self {
            scope,
            outcome,
            active: ChannelKind::Temperature,
        })
    }

    /// Pick the station's latest day, then run the pipeline
    pub fn open_latest<S>(
        engine: &Engine,
        source: &S,
        station: StationId,
        today: NaiveDate,
    ) -> Result<Self>
    where
        S: ReadingSource + LatestDateLookup + ?Sized,
    {
        let day = engine.default_day(source, &station, today);
        Self::open(engine, source, QueryScope::new(station, day))
    }

    pub fn scope(&self) -> &QueryScope {
        &self.scope
    }

    pub fn outcome(&self) -> &QueryOutcome {
        &self.outcome
    }

    pub fn active_channel(&self) -> ChannelKind {
        self.active
    }

    /// Switch the active channel. Uses the cache only.
    pub fn select(&mut self, kind: ChannelKind) -> ChannelView {
        self.active = kind;
        self.view()
    }

    /// View of the active channel
    pub fn view(&self) -> ChannelView {
        self.outcome.view(self.active)
    }

    /// Drop the cached outcome and rerun for a new scope.
    ///
    /// The active channel is kept.
    pub fn change_scope<S>(&mut self, engine: &Engine, source: &S, scope: QueryScope) -> Result<()>
    where
        S: ReadingSource + ?Sized,
    {
        self.outcome = engine.run(source, &scope)?;
        self.scope = scope;
        Ok(())
    }
}
