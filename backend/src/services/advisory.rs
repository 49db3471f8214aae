//! Advisory pipeline shared by the five features
//!
//! weather (best effort) -> prompt -> model -> normalize -> enrich

use std::sync::Arc;

use shared::{Advisory, EnrichedResult, LocationInput, WeatherSnapshot};

use crate::error::AppResult;
use crate::external::{ModelProvider, WeatherProvider, WeatherQuery};
use crate::services::normalizer;

/// Runs advisory requests against the configured weather and model providers
#[derive(Clone)]
pub struct AdvisoryService {
    weather: Arc<dyn WeatherProvider>,
    model: Arc<dyn ModelProvider>,
    country_code: String,
}

impl AdvisoryService {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        model: Arc<dyn ModelProvider>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            weather,
            model,
            country_code: country_code.into(),
        }
    }

    /// Validate, then run the request through the pipeline. Nothing leaves the
    /// process for a request that fails validation.
    pub async fn run<A: Advisory>(&self, request: &A) -> AppResult<EnrichedResult> {
        request.validate()?;

        let feature = A::FEATURE;
        tracing::info!(feature = feature.slug(), "Running advisory request");

        let weather = match request.location() {
            Some(location) => self.lookup_weather(location).await,
            None => None,
        };

        let prompt = request.prompt_pair(weather.as_ref());
        let raw = self
            .model
            .invoke(prompt.system_prompt, &prompt.user_message)
            .await?;
        let advice = normalizer::normalize(&raw)?;

        tracing::debug!(
            feature = feature.slug(),
            with_weather = weather.is_some(),
            "Advisory request completed"
        );

        Ok(EnrichedResult::new(advice, weather, request.input_summary()))
    }

    /// Current weather for the farm, or `None` when it cannot be had
    pub async fn lookup_weather(&self, location: &LocationInput) -> Option<WeatherSnapshot> {
        let query = match WeatherQuery::from_location(location, &self.country_code) {
            Ok(query) => query,
            Err(e) => {
                tracing::warn!("Could not fetch weather data: {}", e);
                return None;
            }
        };

        match self.weather.current_weather(&query).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Could not fetch weather data: {}", e);
                None
            }
        }
    }
}
