// Meteo CLI - Daily trend reports from the command line
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Meteo CLI
//!
//! Prints one station-day of series statistics from a CSV export.
//!
//! ## Usage
//!
//! ```bash
//! # Latest day of the first configured station
//! meteo --csv records.csv
//!
//! # A given day and channel, as JSON
//! meteo --csv records.csv --station STATION_01 --date 2024-03-10 \
//!     --channel humidity --format json
//! ```

mod csv_source;
mod render;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use csv_source::CsvSource;
use meteo::{ChannelKind, Engine, EngineConfig, MeteoError, QueryScope, Session, StationId};
use render::{render_header, render_text, JsonChannel, JsonOutput};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Daily trend report for a weather station
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file with station records
    #[arg(short, long)]
    csv: PathBuf,

    /// Name of the CSV column holding the station id
    #[arg(long, default_value = csv_source::STATION_COLUMN)]
    station_column: String,

    /// Station id (default: first configured station)
    #[arg(short, long)]
    station: Option<String>,

    /// Day to report, YYYY-MM-DD (default: day of the latest record)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Single channel to report (default: all)
    #[arg(long)]
    channel: Option<ChannelKind>,

    /// Engine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// CLI errors
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Meteo(#[from] MeteoError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No station given and none configured")]
    NoStation,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing; `log` records from the engine are bridged in.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    info!("Meteo CLI v{} (engine v{})", env!("CARGO_PKG_VERSION"), meteo::VERSION);

    let config = match &args.config {
        Some(path) => EngineConfig::load(path).map_err(MeteoError::from)?,
        None => EngineConfig::default(),
    };

    let station = match &args.station {
        Some(id) => StationId::from(id.as_str()),
        None => config.default_station().ok_or(CliError::NoStation)?,
    };
    if !config.stations.iter().any(|s| s == station.as_str()) {
        warn!("station {} is not in the configured catalog", station);
    }

    let source = CsvSource::new(&args.csv, config.fields.timestamp.clone())
        .with_station_column(args.station_column.as_str());
    info!("reading records from {}", source.path().display());
    let engine = Engine::new(config)?;

    let mut session = match args.date {
        Some(day) => Session::open(&engine, &source, QueryScope::new(station, day))?,
        None => {
            let today = chrono::Local::now().date_naive();
            Session::open_latest(&engine, &source, station, today)?
        }
    };
    info!("report for {}", session.scope());

    let channels: Vec<ChannelKind> = match args.channel {
        Some(kind) => vec![kind],
        None => ChannelKind::ALL.to_vec(),
    };

    match args.format {
        Format::Text => {
            println!("{}", render_header(session.scope()));
            for kind in channels {
                let view = session.select(kind);
                println!();
                println!("{}", render_text(kind, &view));
            }
        }
        Format::Json => {
            let entries = channels
                .into_iter()
                .map(|kind| JsonChannel::new(kind, session.select(kind)))
                .collect();
            let output = JsonOutput {
                scope: session.scope(),
                channels: entries,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
