//! Blocking HTTP plumbing shared by the weather and geocoding clients

use crate::{PogodaError, Result};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Build a blocking client with the given timeout and User-Agent
pub fn build_client(timeout_seconds: u32, user_agent: &str) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.into()))
        .user_agent(user_agent)
        .build()
        .map_err(PogodaError::from)
}

/// Issue a single GET and decode the JSON body.
///
/// Non-success statuses become [`PogodaError::Upstream`], transport failures
/// [`PogodaError::Network`] and undecodable bodies [`PogodaError::Parse`].
#[instrument(level = "debug", skip(client))]
pub fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    let start = Instant::now();

    let response = client.get(url).send().map_err(|e| {
        warn!("Network error after {:.3}s: {}", start.elapsed().as_secs_f64(), e);
        PogodaError::from(e)
    })?;

    let status = response.status();
    debug!(
        "HTTP response received: {} in {:.3}s",
        status,
        start.elapsed().as_secs_f64()
    );

    if !status.is_success() {
        let message = format!(
            "Request failed with status: {} - {}",
            status,
            status.canonical_reason().unwrap_or("Unknown error")
        );
        warn!("{}", message);
        return Err(PogodaError::upstream(status.as_u16(), message));
    }

    let body = response.text()?;
    serde_json::from_str(&body).map_err(|e| {
        warn!("Failed to decode response body: {}", e);
        PogodaError::parse(format!("Invalid JSON response: {e}"))
    })
}
