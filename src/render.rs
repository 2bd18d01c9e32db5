//! Polish text rendering of weather reports.
//!
//! Rendering is a pure projection of a [`WeatherReport`]; [`crate::parser`]
//! reads the same text back into chart series.

use crate::Result;
use crate::models::{Observation, ReportKind, WeatherParameter, WeatherReport};
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Shown when current conditions yielded none of the selected parameters
pub const NO_CURRENT_DATA: &str = "Brak danych pogodowych dla wybranych parametrów.";
/// Shown when a forecast or historical query yielded no values
pub const NO_FORECAST_DATA: &str = "Brak danych prognozy pogodowej dla wybranych parametrów.";
/// Rendered in place of a null value
pub const MISSING_VALUE: &str = "brak danych";
/// Rendered in place of a precipitation of exactly zero
pub const NO_PRECIPITATION: &str = "brak";
/// Last line of text served from the cache
pub const CACHE_MARKER: &str = "(dane z pamięci podręcznej)";

const MONTHS_GENITIVE: [&str; 12] = [
    "stycznia",
    "lutego",
    "marca",
    "kwietnia",
    "maja",
    "czerwca",
    "lipca",
    "sierpnia",
    "września",
    "października",
    "listopada",
    "grudnia",
];

/// `13 czerwca 12:00`
#[must_use]
pub fn format_timestamp(time: NaiveDateTime) -> String {
    format!(
        "{} {} {:02}:{:02}",
        time.day(),
        MONTHS_GENITIVE[time.month0() as usize],
        time.hour(),
        time.minute()
    )
}

/// Whole numbers keep one decimal (`20.0`), others print as-is (`20.5`)
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// One `label: value unit` line
#[must_use]
pub fn format_value_line(parameter: WeatherParameter, value: Option<f64>) -> String {
    match value {
        None => format!("{}: {MISSING_VALUE}", parameter.label()),
        Some(v) if parameter == WeatherParameter::Precipitation && v == 0.0 => {
            format!("{}: {NO_PRECIPITATION}", parameter.label())
        }
        Some(v) => format!("{}: {} {}", parameter.label(), format_number(v), parameter.unit()),
    }
}

fn render_block(observation: &Observation) -> String {
    let mut block = format!("{}:\n", format_timestamp(observation.time));
    for (parameter, value) in &observation.values {
        block.push_str(&format_value_line(*parameter, *value));
        block.push('\n');
    }
    block
}

/// Render a report as the text block shown to the user
#[must_use]
pub fn render_report(report: &WeatherReport) -> String {
    let mut text = if report.is_empty() {
        let sentinel = match report.kind {
            ReportKind::Current => NO_CURRENT_DATA,
            ReportKind::Forecast | ReportKind::Historical => NO_FORECAST_DATA,
        };
        format!("{sentinel}\n")
    } else {
        report
            .observations
            .iter()
            .map(render_block)
            .collect::<Vec<_>>()
            .join("\n")
    };

    if report.served_from_cache {
        text.push_str(CACHE_MARKER);
        text.push('\n');
    }
    text
}

/// Render either the report or the fixed failure message of the operation
#[must_use]
pub fn render_outcome(kind: ReportKind, outcome: &Result<WeatherReport>) -> String {
    match outcome {
        Ok(report) => render_report(report),
        Err(e) => {
            tracing::error!("{:?} weather request failed: {}", kind, e);
            format!("{}\n", kind.failure_message())
        }
    }
}

/// First line above the rendered text, naming the place and range
#[must_use]
pub fn headline(kind: ReportKind, place: &str, days: u32) -> String {
    match kind {
        ReportKind::Current => format!("Pogoda dla {place}:"),
        ReportKind::Forecast => format!("Prognoza pogody dla {place} na {days} dni:"),
        ReportKind::Historical => format!("Ostatnie {days} dni dla {place}:"),
    }
}
