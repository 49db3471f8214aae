//! Common types used across the platform

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::fields;

/// Where the farm is. Any of city, state or a full coordinate pair is enough
/// to identify it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "fields::number::deserialize", skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "fields::number::deserialize", skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl LocationInput {
    /// Both coordinates, when the farmer supplied a full pair
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// True when the location names at least a city, a state or a coordinate pair
    pub fn is_identifiable(&self) -> bool {
        self.city.is_some() || self.state.is_some() || self.coordinates().is_some()
    }

    /// Short label used in input summaries: city, else state, else "lat, lon"
    pub fn label(&self) -> String {
        if let Some(city) = &self.city {
            return city.clone();
        }
        if let Some(state) = &self.state {
            return state.clone();
        }
        match self.coordinates() {
            Some((lat, lon)) => format!("{}, {}", lat, lon),
            None => String::new(),
        }
    }
}

/// Soil test results. Only `type` is required by the features that use soil.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SoilInput {
    #[serde(rename = "type", default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
    #[serde(default, deserialize_with = "fields::number::deserialize", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 14.0, message = "Soil pH must be between 0 and 14."))]
    pub ph: Option<f64>,
    #[serde(default, deserialize_with = "fields::number::deserialize", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Nitrogen cannot be negative."))]
    pub nitrogen: Option<f64>,
    #[serde(default, deserialize_with = "fields::number::deserialize", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Phosphorus cannot be negative."))]
    pub phosphorus: Option<f64>,
    #[serde(default, deserialize_with = "fields::number::deserialize", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Potassium cannot be negative."))]
    pub potassium: Option<f64>,
    #[serde(default, deserialize_with = "fields::number::deserialize", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0, message = "Organic carbon must be between 0 and 100%."))]
    pub organic_carbon: Option<f64>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub drainage: Option<String>,
}

/// The crop being grown or sold
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropInput {
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub growth_stage: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub sowing_date: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub investment_so_far: Option<String>,
}

/// Current weather at the farm, normalized from the weather provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Degrees Celsius
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity, percent
    pub humidity: i64,
    /// hPa
    pub pressure: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// m/s
    pub wind_speed: f64,
    /// Cloud cover, percent
    pub clouds: i64,
    /// Rain over the last hour (or three hours), mm
    pub rainfall: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
}

/// Echo of the key request fields returned next to the advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
    pub season: String,
}

impl InputSummary {
    pub const SEASON_NOT_SPECIFIED: &'static str = "Not specified";

    pub fn season_or_default(season: Option<&str>) -> String {
        season.unwrap_or(Self::SEASON_NOT_SPECIFIED).to_string()
    }
}

/// System prompt plus rendered user message for one model call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system_prompt: &'static str,
    pub user_message: String,
}

/// Parsed model output merged with the weather snapshot and input summary.
///
/// The advice keys are flattened into the top level of the serialized
/// object; `weatherData` and `inputSummary` always win over model keys with
/// the same name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedResult {
    #[serde(flatten)]
    pub advice: Map<String, Value>,
    pub weather_data: Option<WeatherSnapshot>,
    pub input_summary: InputSummary,
}

impl EnrichedResult {
    pub fn new(
        mut advice: Map<String, Value>,
        weather_data: Option<WeatherSnapshot>,
        input_summary: InputSummary,
    ) -> Self {
        advice.remove("weatherData");
        advice.remove("inputSummary");
        Self {
            advice,
            weather_data,
            input_summary,
        }
    }
}
