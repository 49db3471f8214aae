//! Weather API client for fetching current conditions
//!
//! Integrates with the OpenWeatherMap current weather endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::{LocationInput, WeatherSnapshot};
use thiserror::Error;

use super::WeatherProvider;

/// Weather lookups are best effort. These errors never fail a request;
/// the advisory pipeline turns them into "no weather".
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Either lat/lon or city is required for weather data")]
    InsufficientLocation,

    #[error("Weather request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse weather response: {0}")]
    Parse(String),
}

/// What to ask the weather provider about
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Coordinates { lat: f64, lon: f64 },
    /// `"city,state,country"` or `"city,country"`
    Place(String),
}

impl WeatherQuery {
    /// Coordinates win over names. A location with neither a coordinate pair
    /// nor a city cannot be looked up.
    pub fn from_location(
        location: &LocationInput,
        country_code: &str,
    ) -> Result<Self, WeatherError> {
        if let Some((lat, lon)) = location.coordinates() {
            return Ok(WeatherQuery::Coordinates { lat, lon });
        }

        match (&location.city, &location.state) {
            (Some(city), Some(state)) => Ok(WeatherQuery::Place(format!(
                "{},{},{}",
                city, state, country_code
            ))),
            (Some(city), None) => Ok(WeatherQuery::Place(format!("{},{}", city, country_code))),
            _ => Err(WeatherError::InsufficientLocation),
        }
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            WeatherQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
            WeatherQuery::Place(q) => vec![("q", q.clone())],
        }
    }
}

/// OpenWeatherMap client
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    #[serde(default)]
    weather: Vec<OWMWeather>,
    main: OWMMain,
    wind: OWMWind,
    clouds: OWMClouds,
    rain: Option<OWMRain>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    feels_like: f64,
    pressure: i64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OWMClouds {
    all: i64,
}

#[derive(Debug, Deserialize)]
struct OWMRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

impl OpenWeatherClient {
    /// Create a new OpenWeatherClient
    pub fn new(client: Client, api_key: String) -> Self {
        Self::with_base_url(
            client,
            api_key,
            "https://api.openweathermap.org/data/2.5".to_string(),
        )
    }

    /// Create a new OpenWeatherClient with custom base URL
    pub fn with_base_url(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Convert OpenWeatherMap current response to our format
    fn convert_current_response(&self, data: OWMCurrentResponse) -> WeatherSnapshot {
        let rainfall = data
            .rain
            .as_ref()
            .and_then(|r| r.one_hour.or(r.three_hour))
            .unwrap_or(0.0);

        WeatherSnapshot {
            temperature: data.main.temp,
            feels_like: data.main.feels_like,
            humidity: data.main.humidity,
            pressure: data.main.pressure,
            description: data.weather.into_iter().next().map(|w| w.description),
            wind_speed: data.wind.speed,
            clouds: data.clouds.all,
            rainfall,
            location_name: data.name.filter(|n| !n.is_empty()),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(
        &self,
        query: &WeatherQuery,
    ) -> Result<Option<WeatherSnapshot>, WeatherError> {
        let mut params = query.query_params();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        let response = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Weather API error: {} - {}", status, body);
            return Ok(None);
        }

        let data: OWMCurrentResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        Ok(Some(self.convert_current_response(data)))
    }
}
