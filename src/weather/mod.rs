//! Weather API client for Open-Meteo
//!
//! Three operations (current, forecast, historical) share one request path:
//! derive the cache key, return the cached report on a hit, otherwise fetch,
//! convert and store it with the operation's TTL.

pub mod open_meteo;

use crate::cache::{ResponseCache, cache_key};
use crate::config::PogodaConfig;
use crate::http;
use crate::models::{Coordinates, Observation, ParameterSelection, ReportKind, WeatherReport};
use crate::{PogodaError, Result};
use chrono::{Local, NaiveDate};
use open_meteo::ForecastResponse;
use reqwest::blocking::Client;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

const USER_AGENT: &str = concat!("pogoda/", env!("CARGO_PKG_VERSION"));

/// Longest `past_days` window Open-Meteo accepts
pub const MAX_PAST_DAYS: u32 = 92;

/// Client for the Open-Meteo forecast endpoint
pub struct WeatherClient {
    client: Client,
    base_url: String,
    cache: ResponseCache,
    ttl_hours: u32,
    historical_ttl_hours: u32,
}

impl WeatherClient {
    /// Create a new weather client that reads and writes through `cache`
    pub fn new(config: &PogodaConfig, cache: ResponseCache) -> Result<Self> {
        let client = http::build_client(config.weather.timeout_seconds, USER_AGENT)?;

        Ok(Self {
            client,
            base_url: config.weather.base_url.trim_end_matches('/').to_string(),
            cache,
            ttl_hours: config.cache.ttl_hours,
            historical_ttl_hours: config.cache.historical_ttl_hours,
        })
    }

    #[must_use]
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Give the cache handle back, e.g. to close it
    #[must_use]
    pub fn into_cache(self) -> ResponseCache {
        self.cache
    }

    /// Current conditions plus the latest hourly values of the other selected parameters
    #[instrument(skip(self, parameters), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    pub fn current_weather(
        &self,
        coordinates: Coordinates,
        parameters: &ParameterSelection,
    ) -> Result<WeatherReport> {
        let key = cache_key(ReportKind::Current, coordinates, parameters, &[]);

        self.cached_or_fetch(ReportKind::Current, coordinates, &key, || {
            let url = self.build_url(coordinates, parameters, &["current_weather=true".to_string()]);
            let response: ForecastResponse = http::get_json(&self.client, &url)?;
            Ok(vec![response.current_observation(parameters)?])
        })
    }

    /// Hourly forecast between two dates (inclusive)
    #[instrument(skip(self, parameters), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    pub fn forecast_weather(
        &self,
        coordinates: Coordinates,
        parameters: &ParameterSelection,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<WeatherReport> {
        if start_date > end_date {
            return Err(PogodaError::validation(
                "Data początkowa nie może być po dacie końcowej.",
            ));
        }

        let start = start_date.format("%Y-%m-%d").to_string();
        let end = end_date.format("%Y-%m-%d").to_string();
        let key = cache_key(
            ReportKind::Forecast,
            coordinates,
            parameters,
            &[start.clone(), end.clone()],
        );

        self.cached_or_fetch(ReportKind::Forecast, coordinates, &key, || {
            let url = self.build_url(
                coordinates,
                parameters,
                &[format!("start_date={start}"), format!("end_date={end}")],
            );
            let response: ForecastResponse = http::get_json(&self.client, &url)?;
            match response.hourly {
                Some(hourly) => hourly.observations(parameters, |_| true),
                None => Ok(Vec::new()),
            }
        })
    }

    /// Hourly data for the last `past_days` days, excluding today and later
    pub fn historical_weather(
        &self,
        coordinates: Coordinates,
        parameters: &ParameterSelection,
        past_days: u32,
    ) -> Result<WeatherReport> {
        self.historical_weather_before(coordinates, parameters, past_days, Local::now().date_naive())
    }

    /// Like [`Self::historical_weather`] with an explicit notion of "today"
    #[instrument(skip(self, parameters), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    pub fn historical_weather_before(
        &self,
        coordinates: Coordinates,
        parameters: &ParameterSelection,
        past_days: u32,
        today: NaiveDate,
    ) -> Result<WeatherReport> {
        if past_days == 0 || past_days > MAX_PAST_DAYS {
            return Err(PogodaError::validation(format!(
                "Liczba dni musi mieścić się w zakresie 1-{MAX_PAST_DAYS}, podano: {past_days}"
            )));
        }

        let key = cache_key(
            ReportKind::Historical,
            coordinates,
            parameters,
            &[past_days.to_string()],
        );

        self.cached_or_fetch(ReportKind::Historical, coordinates, &key, || {
            let url = self.build_url(coordinates, parameters, &[format!("past_days={past_days}")]);
            let response: ForecastResponse = http::get_json(&self.client, &url)?;
            match response.hourly {
                Some(hourly) => hourly.observations(parameters, |date| date < today),
                None => Ok(Vec::new()),
            }
        })
    }

    fn build_url(
        &self,
        coordinates: Coordinates,
        parameters: &ParameterSelection,
        extra: &[String],
    ) -> String {
        let mut url = format!(
            "{}/forecast?latitude={}&longitude={}",
            self.base_url, coordinates.latitude, coordinates.longitude
        );
        for item in extra {
            url.push('&');
            url.push_str(item);
        }
        if !parameters.is_empty() {
            url.push_str("&hourly=");
            url.push_str(&parameters.joined());
        }
        url.push_str("&timezone=auto");
        url
    }

    fn cached_or_fetch(
        &self,
        kind: ReportKind,
        coordinates: Coordinates,
        key: &str,
        fetch: impl FnOnce() -> Result<Vec<Observation>>,
    ) -> Result<WeatherReport> {
        debug!("Cache key: {}", key);

        match self.cache.get::<WeatherReport>(key) {
            Ok(Some(mut report)) => {
                info!("Serving {:?} weather from cache", kind);
                report.served_from_cache = true;
                return Ok(report);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read failed, fetching from upstream: {}", e),
        }

        let start_time = Instant::now();
        let observations = fetch()?;
        let report = WeatherReport::new(kind, coordinates, observations);

        info!(
            "Retrieved {:?} weather with {} observations in {:.3}s",
            kind,
            report.observations.len(),
            start_time.elapsed().as_secs_f64()
        );

        let ttl = kind.ttl(self.ttl_hours, self.historical_ttl_hours);
        if let Err(e) = self.cache.put(key, &report, ttl) {
            warn!("Failed to store weather in cache: {}", e);
        }

        Ok(report)
    }
}
