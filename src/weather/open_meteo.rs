//! `OpenMeteo` API response structures and conversion to observations

use crate::models::{Observation, ParameterSelection, WeatherParameter};
use crate::{PogodaError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::HashMap;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Forecast endpoint response
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub current_weather: Option<CurrentWeather>,
    pub hourly: Option<HourlyData>,
}

/// `current_weather` block (present when `current_weather=true`)
#[derive(Debug, Deserialize)]
pub struct CurrentWeather {
    pub time: String,
    pub temperature: Option<f64>,
    pub windspeed: Option<f64>,
}

/// Hourly block: a shared `time` array plus one index-aligned array per variable
#[derive(Debug, Deserialize)]
pub struct HourlyData {
    pub time: Vec<String>,
    #[serde(flatten)]
    pub series: HashMap<String, Vec<Option<f64>>>,
}

pub fn parse_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|e| PogodaError::parse(format!("Invalid timestamp '{value}': {e}")))
}

impl HourlyData {
    /// `None` if the variable is absent from the response, `Some(None)` if it is null
    fn value_at(&self, parameter: WeatherParameter, index: usize) -> Option<Option<f64>> {
        self.series
            .get(parameter.api_name())
            .map(|values| values.get(index).copied().flatten())
    }

    /// One observation per timestamp whose date passes `keep`
    pub fn observations(
        &self,
        parameters: &ParameterSelection,
        keep: impl Fn(NaiveDate) -> bool,
    ) -> Result<Vec<Observation>> {
        let mut observations = Vec::with_capacity(self.time.len());

        for (index, raw_time) in self.time.iter().enumerate() {
            let time = parse_time(raw_time)?;
            if !keep(time.date()) {
                continue;
            }

            let mut observation = Observation::new(time);
            for parameter in parameters.iter() {
                if let Some(value) = self.value_at(parameter, index) {
                    observation.values.insert(parameter, value);
                }
            }
            observations.push(observation);
        }

        Ok(observations)
    }
}

impl ForecastResponse {
    /// Current conditions: headline values from `current_weather`, the rest from
    /// the last hourly sample.
    pub fn current_observation(&self, parameters: &ParameterSelection) -> Result<Observation> {
        let current = self
            .current_weather
            .as_ref()
            .ok_or_else(|| PogodaError::parse("No current weather data in response"))?;

        let mut observation = Observation::new(parse_time(&current.time)?);

        if parameters.contains(WeatherParameter::Temperature) {
            if let Some(temperature) = current.temperature {
                observation
                    .values
                    .insert(WeatherParameter::Temperature, Some(temperature));
            }
        }
        if parameters.contains(WeatherParameter::WindSpeed) {
            if let Some(windspeed) = current.windspeed {
                observation
                    .values
                    .insert(WeatherParameter::WindSpeed, Some(windspeed));
            }
        }

        if let Some(hourly) = &self.hourly {
            if let Some(latest) = hourly.time.len().checked_sub(1) {
                for parameter in [
                    WeatherParameter::SurfacePressure,
                    WeatherParameter::Precipitation,
                    WeatherParameter::SoilTemperature,
                ] {
                    if !parameters.contains(parameter) {
                        continue;
                    }
                    if let Some(value) = hourly.value_at(parameter, latest) {
                        observation.values.insert(parameter, value);
                    }
                }
            }
        }

        Ok(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(list: &[WeatherParameter]) -> ParameterSelection {
        list.iter().copied().collect()
    }

    const CURRENT_BODY: &str = r#"{
        "latitude": 52.23,
        "longitude": 21.01,
        "current_weather": {"time": "2025-06-13T12:00", "temperature": 20.5, "windspeed": 11.2, "winddirection": 270},
        "hourly_units": {"time": "iso8601", "surface_pressure": "hPa"},
        "hourly": {
            "time": ["2025-06-13T11:00", "2025-06-13T12:00", "2025-06-13T13:00"],
            "surface_pressure": [1011.0, 1012.5, 1013.2],
            "precipitation": [0.0, 0.4, null]
        }
    }"#;

    #[test]
    fn test_current_observation_uses_headline_and_last_hourly() {
        let response: ForecastResponse = serde_json::from_str(CURRENT_BODY).unwrap();
        let params = selection(&[
            WeatherParameter::Temperature,
            WeatherParameter::WindSpeed,
            WeatherParameter::SurfacePressure,
            WeatherParameter::Precipitation,
        ]);

        let obs = response.current_observation(&params).unwrap();
        assert_eq!(obs.time, parse_time("2025-06-13T12:00").unwrap());
        assert_eq!(obs.value(WeatherParameter::Temperature), Some(20.5));
        assert_eq!(obs.value(WeatherParameter::WindSpeed), Some(11.2));
        assert_eq!(obs.value(WeatherParameter::SurfacePressure), Some(1013.2));
        // Last precipitation sample is null: present but without a value.
        assert!(obs.values.contains_key(&WeatherParameter::Precipitation));
        assert_eq!(obs.value(WeatherParameter::Precipitation), None);
    }

    #[test]
    fn test_current_observation_omits_unselected_and_absent() {
        let response: ForecastResponse = serde_json::from_str(CURRENT_BODY).unwrap();
        let params = selection(&[WeatherParameter::Temperature, WeatherParameter::SoilTemperature]);

        let obs = response.current_observation(&params).unwrap();
        assert_eq!(obs.values.len(), 1);
        assert!(obs.values.contains_key(&WeatherParameter::Temperature));
    }

    #[test]
    fn test_current_observation_requires_current_block() {
        let response: ForecastResponse =
            serde_json::from_str(r#"{"hourly": {"time": []}}"#).unwrap();
        let err = response
            .current_observation(&ParameterSelection::all())
            .unwrap_err();
        assert!(matches!(err, PogodaError::Parse { .. }));
    }

    #[test]
    fn test_hourly_observations_filter_by_date() {
        let hourly: HourlyData = serde_json::from_str(
            r#"{
                "time": ["2025-06-12T23:00", "2025-06-13T00:00", "2025-06-13T01:00"],
                "temperature_2m": [14.1, 13.9, 13.5]
            }"#,
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 6, 13).unwrap();
        let params = selection(&[WeatherParameter::Temperature, WeatherParameter::WindSpeed]);

        let all = hourly.observations(&params, |_| true).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].value(WeatherParameter::Temperature), Some(13.5));
        assert!(!all[0].values.contains_key(&WeatherParameter::WindSpeed));

        let past = hourly.observations(&params, |date| date < today).unwrap();
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].value(WeatherParameter::Temperature), Some(14.1));
    }

    #[test]
    fn test_invalid_timestamp() {
        assert!(parse_time("13.06.2025 12:00").is_err());
    }
}
