//! Weather variables that can be requested from Open-Meteo

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::PogodaError;

/// One requestable weather variable.
///
/// Variant order is the display order of rendered lines and the order of the
/// parameter list in requests and cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeatherParameter {
    #[serde(rename = "temperature_2m")]
    Temperature,
    #[serde(rename = "soil_temperature_0cm")]
    SoilTemperature,
    #[serde(rename = "windspeed_10m")]
    WindSpeed,
    #[serde(rename = "precipitation")]
    Precipitation,
    #[serde(rename = "surface_pressure")]
    SurfacePressure,
}

impl WeatherParameter {
    pub const ALL: [WeatherParameter; 5] = [
        Self::Temperature,
        Self::SoilTemperature,
        Self::WindSpeed,
        Self::Precipitation,
        Self::SurfacePressure,
    ];

    /// Name used in the `hourly=` query parameter and response keys
    #[must_use]
    pub fn api_name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature_2m",
            Self::SoilTemperature => "soil_temperature_0cm",
            Self::WindSpeed => "windspeed_10m",
            Self::Precipitation => "precipitation",
            Self::SurfacePressure => "surface_pressure",
        }
    }

    /// Polish label used in rendered text
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperatura",
            Self::SoilTemperature => "Temperatura gleby",
            Self::WindSpeed => "Wiatr",
            Self::Precipitation => "Opady",
            Self::SurfacePressure => "Ciśnienie",
        }
    }

    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature | Self::SoilTemperature => "°C",
            Self::WindSpeed => "km/h",
            Self::Precipitation => "mm",
            Self::SurfacePressure => "hPa",
        }
    }
}

impl fmt::Display for WeatherParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for WeatherParameter {
    type Err = PogodaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.api_name() == s)
            .ok_or_else(|| PogodaError::validation(format!("Unknown weather parameter: {s}")))
    }
}

/// Set of enabled weather variables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSelection(BTreeSet<WeatherParameter>);

impl ParameterSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every parameter of the vocabulary
    #[must_use]
    pub fn all() -> Self {
        WeatherParameter::ALL.into_iter().collect()
    }

    /// Returns `false` if the parameter was already selected
    pub fn insert(&mut self, parameter: WeatherParameter) -> bool {
        self.0.insert(parameter)
    }

    #[must_use]
    pub fn contains(&self, parameter: WeatherParameter) -> bool {
        self.0.contains(&parameter)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate in vocabulary order
    pub fn iter(&self) -> impl Iterator<Item = WeatherParameter> + '_ {
        self.0.iter().copied()
    }

    /// Comma-joined API names, e.g. `temperature_2m,precipitation`
    #[must_use]
    pub fn joined(&self) -> String {
        self.iter()
            .map(WeatherParameter::api_name)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<WeatherParameter> for ParameterSelection {
    fn from_iter<I: IntoIterator<Item = WeatherParameter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
