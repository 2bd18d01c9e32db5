//! `pogoda` - weather for a place or coordinates, in Polish
//!
//! This library provides geocoding through Nominatim, current, forecast and
//! historical queries against Open-Meteo with an on-disk response cache, and
//! the text, chart and export projections of the results.

pub mod cache;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod geocoding;
pub mod http;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod parser;
pub mod render;
pub mod weather;

// Re-export core types for public API
pub use cache::{ResponseCache, cache_key};
pub use chart::{ChartData, ChartSeries, Metric};
pub use config::PogodaConfig;
pub use error::PogodaError;
pub use geocoding::Geocoder;
pub use location_resolver::{LocationInput, LocationParser, LocationResolver};
pub use models::{
    Coordinates, Location, Observation, ParameterSelection, ReportKind, WeatherParameter,
    WeatherReport,
};
pub use parser::{ParsedSample, parse_series};
pub use weather::WeatherClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PogodaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
