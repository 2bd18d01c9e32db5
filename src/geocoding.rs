//! Forward and reverse geocoding through Nominatim (OpenStreetMap).
//!
//! Every call is one GET with the configured User-Agent; nothing is retried
//! or cached.

use crate::config::GeocodingConfig;
use crate::http;
use crate::models::Coordinates;
use crate::{PogodaError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Returned by reverse lookups whose address has none of the known place fields
pub const UNKNOWN_LOCATION: &str = "Nieznana lokalizacja";

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<Address>,
}

/// Subset of a Nominatim address, in fallback priority order
#[derive(Debug, Default, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub hamlet: Option<String>,
    pub county: Option<String>,
}

impl Address {
    /// First present of city, town, village, hamlet, county
    #[must_use]
    pub fn place_name(&self) -> Option<&str> {
        [
            &self.city,
            &self.town,
            &self.village,
            &self.hamlet,
            &self.county,
        ]
        .into_iter()
        .find_map(|field| field.as_deref())
    }
}

/// Nominatim client
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = http::build_client(config.timeout_seconds, &config.user_agent)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Place name → coordinates of the best match
    #[instrument(skip(self))]
    pub fn forward(&self, place_name: &str) -> Result<Coordinates> {
        info!("Geocoding location: '{}'", place_name);

        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(place_name)
        );
        debug!("Nominatim request URL: {}", url);

        let results: Vec<SearchResult> = http::get_json(&self.client, &url)?;
        let Some(best) = results.into_iter().next() else {
            warn!("No results found for location '{}'", place_name);
            return Err(PogodaError::not_found(format!("City not found: {place_name}")));
        };

        let latitude = parse_degrees(&best.lat, "latitude")?;
        let longitude = parse_degrees(&best.lon, "longitude")?;
        let coordinates = Coordinates::new(latitude, longitude)
            .map_err(|e| PogodaError::parse(format!("Nominatim returned invalid coordinates: {e}")))?;

        info!(
            "Found '{}' at ({:.4}, {:.4})",
            place_name, coordinates.latitude, coordinates.longitude
        );
        Ok(coordinates)
    }

    /// Coordinates → most specific available place name
    #[instrument(skip(self))]
    pub fn reverse(&self, latitude: f64, longitude: f64) -> Result<String> {
        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.base_url, latitude, longitude
        );
        debug!("Nominatim request URL: {}", url);

        let response: ReverseResponse = http::get_json(&self.client, &url)?;
        let address = response.address.ok_or_else(|| {
            PogodaError::not_found(format!(
                "No address found for coordinates {latitude}, {longitude}"
            ))
        })?;

        let name = address.place_name().unwrap_or(UNKNOWN_LOCATION).to_string();
        info!("Reverse geocoded to: {}", name);
        Ok(name)
    }
}

fn parse_degrees(value: &str, field: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| PogodaError::parse(format!("Invalid {field} '{value}': {e}")))
}
