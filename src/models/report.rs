//! Structured weather results returned by the weather client

use super::{Coordinates, WeatherParameter};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Which weather operation produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    Current,
    Forecast,
    Historical,
}

impl ReportKind {
    /// Prefix of cache keys for this operation
    #[must_use]
    pub fn cache_prefix(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Forecast => "forecast",
            Self::Historical => "historical",
        }
    }

    /// Fixed Polish message shown when the operation fails
    #[must_use]
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Current => "Błąd podczas pobierania pogody.",
            Self::Forecast => "Błąd podczas pobierania prognozy pogody.",
            Self::Historical => "Błąd podczas pobierania danych historycznych.",
        }
    }

    /// Cache lifetime for results of this operation
    #[must_use]
    pub fn ttl(self, ttl_hours: u32, historical_ttl_hours: u32) -> Duration {
        let hours = match self {
            Self::Current | Self::Forecast => ttl_hours,
            Self::Historical => historical_ttl_hours,
        };
        Duration::from_secs(u64::from(hours) * 60 * 60)
    }
}

/// Values of the selected parameters at one point in time.
///
/// A parameter missing from `values` was absent from the upstream response;
/// a `None` value means the upstream sent `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub time: NaiveDateTime,
    pub values: BTreeMap<WeatherParameter, Option<f64>>,
}

impl Observation {
    #[must_use]
    pub fn new(time: NaiveDateTime) -> Self {
        Self {
            time,
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn value(&self, parameter: WeatherParameter) -> Option<f64> {
        self.values.get(&parameter).copied().flatten()
    }
}

/// Result of a weather query, in upstream (ascending) time order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub kind: ReportKind,
    pub coordinates: Coordinates,
    pub observations: Vec<Observation>,
    #[serde(skip)]
    pub served_from_cache: bool,
}

impl WeatherReport {
    #[must_use]
    pub fn new(kind: ReportKind, coordinates: Coordinates, observations: Vec<Observation>) -> Self {
        Self {
            kind,
            coordinates,
            observations,
            served_from_cache: false,
        }
    }

    /// True when no observation carries any parameter
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.iter().all(|o| o.values.is_empty())
    }
}
