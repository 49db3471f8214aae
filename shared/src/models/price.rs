//! Price forecast request

use serde::{Deserialize, Serialize};

use crate::advisory::{Advisory, Feature};
use crate::fields;
use crate::prompts::{build_price_forecaster_prompt, PRICE_FORECASTER_SYSTEM_PROMPT};
use crate::types::{CropInput, InputSummary, LocationInput, WeatherSnapshot};
use crate::validation::{self, ValidationError};

/// POST /price/forecast body. Soil plays no part in price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceForecastRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationInput>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub harvest_date: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub storage_available: Option<String>,
}

impl Advisory for PriceForecastRequest {
    const FEATURE: Feature = Feature::PriceForecast;
    const SYSTEM_PROMPT: &'static str = PRICE_FORECASTER_SYSTEM_PROMPT;

    fn validate(&self) -> Result<(), ValidationError> {
        validation::require_crop_name(self.crop.as_ref(), "Crop name is required.")?;
        validation::require_location(self.location.as_ref(), "Location is required.")?;
        validation::check_coordinates(self.location.as_ref())
    }

    fn location(&self) -> Option<&LocationInput> {
        self.location.as_ref()
    }

    fn build_prompt(&self, weather: Option<&WeatherSnapshot>) -> String {
        build_price_forecaster_prompt(self, weather)
    }

    fn input_summary(&self) -> InputSummary {
        InputSummary {
            crop: self.crop.as_ref().and_then(|c| c.name.clone()),
            location: self.location.as_ref().map(LocationInput::label).unwrap_or_default(),
            soil_type: None,
            season: InputSummary::season_or_default(self.season.as_deref()),
        }
    }
}
