//! Recover chart series from rendered weather text.
//!
//! The text is split into windows, one per timestamp line, and each window is
//! searched for the first line of every recognized label.

use crate::render::MISSING_VALUE;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Place name used when a headline cannot be interpreted
pub const UNKNOWN_CITY: &str = "Nieznane miasto";

static TIMESTAMP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2} \p{L}+ \d{2}:\d{2}:?$").expect("timestamp pattern is valid")
});

/// Values recovered for one timestamp
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedSample {
    /// Display timestamp, e.g. `13 czerwca 12:00`
    pub timestamp: String,
    pub temperature: Option<f64>,
    pub rain: Option<f64>,
    pub wind: Option<f64>,
    pub pressure: Option<f64>,
}

#[derive(Clone, Copy)]
enum Field {
    Temperature,
    Rain,
    Wind,
    Pressure,
}

impl Field {
    const ALL: [Field; 4] = [Field::Temperature, Field::Rain, Field::Wind, Field::Pressure];

    /// `line` must already be lowercase
    fn matches(self, line: &str) -> bool {
        match self {
            Field::Temperature => {
                line.starts_with("temperatura") && !line.starts_with("temperatura gleby")
            }
            Field::Rain => line.starts_with("opad"),
            Field::Wind => line.starts_with("wiatr"),
            Field::Pressure => line.starts_with("ciśnienie"),
        }
    }

    fn slot(self, sample: &mut ParsedSample) -> &mut Option<f64> {
        match self {
            Field::Temperature => &mut sample.temperature,
            Field::Rain => &mut sample.rain,
            Field::Wind => &mut sample.wind,
            Field::Pressure => &mut sample.pressure,
        }
    }
}

fn is_timestamp_line(line: &str) -> bool {
    TIMESTAMP_LINE.is_match(line.trim())
}

/// Numeric value of a `label: value unit` line.
///
/// `brak danych` is a missing value; a value with no digits at all (`brak`)
/// reads as zero; anything else that fails to parse is logged and missing.
fn extract_value(line: &str) -> Option<f64> {
    let value_part = line.split_once(':').map_or(line, |(_, rest)| rest).trim();
    if value_part.eq_ignore_ascii_case(MISSING_VALUE) {
        return None;
    }

    let numeric: String = value_part
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if numeric.is_empty() {
        return Some(0.0);
    }

    match numeric.parse::<f64>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Unparseable value '{}' in line '{}': {}", numeric, line, e);
            None
        }
    }
}

/// One sample per timestamp line, in the order the lines appear
#[must_use]
pub fn parse_series(text: &str) -> Vec<ParsedSample> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_timestamp_line(line))
        .map(|(index, _)| index)
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(lines.len());
            let mut sample = ParsedSample {
                timestamp: lines[start].trim_end_matches(':').to_string(),
                ..ParsedSample::default()
            };

            for field in Field::ALL {
                let found = lines[start + 1..end]
                    .iter()
                    .find(|line| field.matches(&line.to_lowercase()));
                if let Some(line) = found {
                    *field.slot(&mut sample) = extract_value(line);
                }
            }
            sample
        })
        .collect()
}

/// Place name from a headline produced by [`crate::render::headline`]
#[must_use]
pub fn parse_place_name(headline: &str) -> String {
    let headline = headline.trim().trim_end_matches(':');

    let place = if let Some(rest) = headline.strip_prefix("Prognoza pogody dla ") {
        rest.rsplit_once(" na ").map(|(place, _)| place)
    } else if headline.starts_with("Ostatnie ") {
        headline.split_once(" dla ").map(|(_, place)| place)
    } else {
        headline.strip_prefix("Pogoda dla ")
    };

    place
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(UNKNOWN_CITY)
        .to_string()
}
