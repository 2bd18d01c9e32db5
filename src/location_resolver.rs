//! Location Resolution Module
//!
//! Turns raw user input (coordinates or a place name) into a [`Location`]
//! with coordinates and a display name.

use crate::geocoding::{Geocoder, UNKNOWN_LOCATION};
use crate::models::{Coordinates, Location};
use crate::{PogodaError, Result};
use tracing::{debug, warn};

/// Types of location input
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Validated coordinates
    Coordinates(Coordinates),
    /// Place name (city, village, etc.)
    Name(String),
}

/// Classifies raw location text
pub struct LocationParser;

impl LocationParser {
    /// Parse `"lat,lon"`, `"lat lon"` or a place name
    pub fn parse(input: &str) -> Result<LocationInput> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PogodaError::validation("Nie podano lokalizacji."));
        }

        if let Some(coordinates) = Self::parse_coordinates(input) {
            return Ok(LocationInput::Coordinates(coordinates));
        }

        Ok(LocationInput::Name(input.to_string()))
    }

    /// Two numbers separated by a comma and/or whitespace, within range
    fn parse_coordinates(input: &str) -> Option<Coordinates> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        let [lat, lon] = parts.as_slice() else {
            return None;
        };

        let lat = lat.parse::<f64>().ok()?;
        let lon = lon.parse::<f64>().ok()?;
        Coordinates::new(lat, lon).ok()
    }
}

/// Service for resolving location inputs
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a location input into a structured [`Location`]
    pub fn resolve(geocoder: &Geocoder, input: LocationInput) -> Result<Location> {
        debug!("Resolving location input: {:?}", input);

        let location = match input {
            LocationInput::Coordinates(coordinates) => {
                Self::resolve_coordinates(geocoder, coordinates)
            }
            LocationInput::Name(name) => {
                let coordinates = geocoder.forward(&name)?;
                Location::new(coordinates, name)
            }
        };

        debug!(
            "Resolved location: {} at ({}, {})",
            location.name, location.coordinates.latitude, location.coordinates.longitude
        );

        Ok(location)
    }

    /// Reverse geocoding failures never block a coordinate query
    fn resolve_coordinates(geocoder: &Geocoder, coordinates: Coordinates) -> Location {
        let place = match geocoder.reverse(coordinates.latitude, coordinates.longitude) {
            Ok(place) => place,
            Err(e) => {
                warn!("Reverse geocoding failed: {}, using placeholder name", e);
                UNKNOWN_LOCATION.to_string()
            }
        };

        Location::new(coordinates, display_name(coordinates, &place))
    }
}

/// `52.2297, 21.0122 (Warszawa)`
#[must_use]
pub fn display_name(coordinates: Coordinates, place: &str) -> String {
    format!("{} ({place})", coordinates.format_coordinates())
}
