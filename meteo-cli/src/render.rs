// Meteo CLI - Report rendering
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Text and JSON rendering of channel views.

use meteo::{ChannelKind, ChannelReport, ChannelView, QueryScope, TrendDirection};
use serde::Serialize;
use std::fmt::Write;

/// Arrow shown next to the trend magnitude.
pub fn trend_arrow(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Up => "⬆",
        TrendDirection::Down => "⬇",
        TrendDirection::Flat => "➡",
    }
}

/// Header line for a scope.
pub fn render_header(scope: &QueryScope) -> String {
    format!("Station {} - {}", scope.station, scope.day)
}

/// One channel as a block of text.
pub fn render_text(kind: ChannelKind, view: &ChannelView) -> String {
    match view {
        ChannelView::Ready(report) => render_report(report),
        ChannelView::NoData(_) => format!("{}: no data", kind.label()),
        ChannelView::FetchFailed(e) => format!("{}: connection error ({})", kind.label(), e),
    }
}

fn render_report(report: &ChannelReport) -> String {
    let s = &report.statistics;
    let unit = report.unit;
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(
        out,
        "{} ({} readings, {} points)",
        report.channel.label(),
        s.count,
        report.series.len()
    );
    let _ = writeln!(out, "  max        {:.1} {}", s.max, unit);
    let _ = writeln!(out, "  min        {:.1} {}", s.min, unit);
    let _ = writeln!(out, "  mean       {:.2} {}", s.mean, unit);
    let _ = writeln!(out, "  amplitude  {:.1} {}", s.amplitude, unit);
    let _ = write!(
        out,
        "  trend      {} {:+.1} {}",
        trend_arrow(s.trend.direction),
        s.trend.magnitude,
        unit
    );
    out
}

/// JSON document for a whole run.
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    pub scope: &'a QueryScope,
    pub channels: Vec<JsonChannel>,
}

/// JSON entry for one channel.
#[derive(Debug, Serialize)]
pub struct JsonChannel {
    pub channel: ChannelKind,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ChannelReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JsonChannel {
    pub fn new(kind: ChannelKind, view: ChannelView) -> Self {
        match view {
            ChannelView::Ready(report) => Self {
                channel: kind,
                status: "ready",
                report: Some(report),
                error: None,
            },
            ChannelView::NoData(_) => Self {
                channel: kind,
                status: "no_data",
                report: None,
                error: None,
            },
            ChannelView::FetchFailed(e) => Self {
                channel: kind,
                status: "fetch_failed",
                report: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo::{Engine, EngineConfig, RawRecord, SourceError};

    fn ready_view() -> ChannelView {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let outcome = engine.ingest(&[
            RawRecord::new().with("timestamp", 0).with("temperatura", 20.0),
            RawRecord::new().with("timestamp", 100).with("temperatura", 22.0),
            RawRecord::new().with("timestamp", 350).with("temperatura", 24.0),
        ]);
        outcome.view(ChannelKind::Temperature)
    }

    #[test]
    fn test_render_ready() {
        let text = render_text(ChannelKind::Temperature, &ready_view());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Temperature (3 readings, 2 points)");
        assert_eq!(lines[1], "  max        24.0 °C");
        assert_eq!(lines[2], "  min        20.0 °C");
        assert_eq!(lines[3], "  mean       22.00 °C");
        assert_eq!(lines[4], "  amplitude  4.0 °C");
        assert_eq!(lines[5], "  trend      ⬆ +3.0 °C");
    }

    #[test]
    fn test_render_absent() {
        let no_data = render_text(
            ChannelKind::Humidity,
            &ChannelView::NoData(ChannelKind::Humidity),
        );
        assert_eq!(no_data, "Humidity: no data");

        let failed = render_text(
            ChannelKind::Humidity,
            &ChannelView::FetchFailed(SourceError::unavailable("timeout")),
        );
        assert!(failed.starts_with("Humidity: connection error"));
    }

    #[test]
    fn test_arrows() {
        assert_eq!(trend_arrow(TrendDirection::Up), "⬆");
        assert_eq!(trend_arrow(TrendDirection::Down), "⬇");
        assert_eq!(trend_arrow(TrendDirection::Flat), "➡");
    }

    #[test]
    fn test_json_channel() {
        let ready = serde_json::to_value(JsonChannel::new(ChannelKind::Temperature, ready_view()))
            .unwrap();
        assert_eq!(ready["status"], "ready");
        assert_eq!(ready["report"]["statistics"]["count"], 3);
        assert!(ready.get("error").is_none());

        let failed = serde_json::to_value(JsonChannel::new(
            ChannelKind::Particulate,
            ChannelView::FetchFailed(SourceError::unavailable("down")),
        ))
        .unwrap();
        assert_eq!(failed["status"], "fetch_failed");
        assert_eq!(failed["channel"], "particulate");
        assert!(failed.get("report").is_none());
    }
}
