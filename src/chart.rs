//! Chart-ready series built from parsed weather text

use crate::models::{ParameterSelection, WeatherParameter};
use crate::parser::{self, ParsedSample};
use serde::Serialize;
use std::fmt;

/// Charted quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    Temperature,
    Rain,
    Wind,
    Pressure,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Temperature,
        Metric::Rain,
        Metric::Wind,
        Metric::Pressure,
    ];

    /// Charted counterpart of a weather parameter; soil temperature has none
    #[must_use]
    pub fn for_parameter(parameter: WeatherParameter) -> Option<Self> {
        match parameter {
            WeatherParameter::Temperature => Some(Metric::Temperature),
            WeatherParameter::Precipitation => Some(Metric::Rain),
            WeatherParameter::WindSpeed => Some(Metric::Wind),
            WeatherParameter::SurfacePressure => Some(Metric::Pressure),
            WeatherParameter::SoilTemperature => None,
        }
    }

    /// Metrics charted for a selection, in chart order
    #[must_use]
    pub fn selected(parameters: &ParameterSelection) -> Vec<Self> {
        Metric::ALL
            .into_iter()
            .filter(|metric| {
                parameters
                    .iter()
                    .any(|p| Metric::for_parameter(p) == Some(*metric))
            })
            .collect()
    }

    /// Series name shown in charts and export files
    #[must_use]
    pub fn series_name(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperatura [°C]",
            Metric::Rain => "Opady [mm]",
            Metric::Wind => "Wiatr [km/h]",
            Metric::Pressure => "Ciśnienie [hPa]",
        }
    }

    /// Leading component of export file names
    #[must_use]
    pub fn file_prefix(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Rain => "Rain",
            Metric::Wind => "Wind",
            Metric::Pressure => "Pressure",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.series_name())
    }
}

/// One named series of `(timestamp, value)` points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub metric: Metric,
    pub name: String,
    pub points: Vec<(String, f64)>,
}

/// Index-aligned series for every metric; missing values are charted as zero
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub place: String,
    /// First timestamp, empty when there are no samples
    pub start: String,
    /// Last timestamp, empty when there are no samples
    pub end: String,
    pub timestamps: Vec<String>,
    pub temperature: Vec<f64>,
    pub rain: Vec<f64>,
    pub wind: Vec<f64>,
    pub pressure: Vec<f64>,
}

impl ChartData {
    #[must_use]
    pub fn from_samples(place: impl Into<String>, samples: &[ParsedSample]) -> Self {
        let timestamps: Vec<String> = samples.iter().map(|s| s.timestamp.clone()).collect();
        let column = |pick: fn(&ParsedSample) -> Option<f64>| -> Vec<f64> {
            samples.iter().map(|s| pick(s).unwrap_or(0.0)).collect()
        };

        Self {
            place: place.into(),
            start: timestamps.first().cloned().unwrap_or_default(),
            end: timestamps.last().cloned().unwrap_or_default(),
            temperature: column(|s| s.temperature),
            rain: column(|s| s.rain),
            wind: column(|s| s.wind),
            pressure: column(|s| s.pressure),
            timestamps,
        }
    }

    /// Build from displayed text whose first line is the headline
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let place = parser::parse_place_name(text.lines().next().unwrap_or_default());
        Self::from_samples(place, &parser::parse_series(text))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    fn values(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Temperature => &self.temperature,
            Metric::Rain => &self.rain,
            Metric::Wind => &self.wind,
            Metric::Pressure => &self.pressure,
        }
    }

    #[must_use]
    pub fn series(&self, metric: Metric) -> ChartSeries {
        ChartSeries {
            metric,
            name: metric.series_name().to_string(),
            points: self
                .timestamps
                .iter()
                .cloned()
                .zip(self.values(metric).iter().copied())
                .collect(),
        }
    }

    #[must_use]
    pub fn all_series(&self) -> Vec<ChartSeries> {
        Metric::ALL.into_iter().map(|m| self.series(m)).collect()
    }
}
