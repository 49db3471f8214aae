//! Crop recommendation request

use serde::{Deserialize, Serialize};

use crate::advisory::{Advisory, Feature};
use crate::fields;
use crate::prompts::{build_crop_recommender_prompt, CROP_RECOMMENDER_SYSTEM_PROMPT};
use crate::types::{InputSummary, LocationInput, SoilInput, WeatherSnapshot};
use crate::validation::{self, ValidationError};

/// POST /crop/recommend body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil: Option<SoilInput>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub land_area: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub water_availability: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub irrigation_type: Option<String>,
}

impl Advisory for CropRecommendRequest {
    const FEATURE: Feature = Feature::CropRecommendation;
    const SYSTEM_PROMPT: &'static str = CROP_RECOMMENDER_SYSTEM_PROMPT;

    fn validate(&self) -> Result<(), ValidationError> {
        validation::require_location(
            self.location.as_ref(),
            "Location is required. Provide city/state or lat/lon.",
        )?;
        validation::require_soil_type(
            self.soil.as_ref(),
            "Soil data is required. At minimum, provide soil type.",
        )?;
        validation::check_coordinates(self.location.as_ref())?;
        validation::check_soil_ranges(self.soil.as_ref())
    }

    fn location(&self) -> Option<&LocationInput> {
        self.location.as_ref()
    }

    fn build_prompt(&self, weather: Option<&WeatherSnapshot>) -> String {
        build_crop_recommender_prompt(self, weather)
    }

    fn input_summary(&self) -> InputSummary {
        InputSummary {
            crop: None,
            location: self.location.as_ref().map(LocationInput::label).unwrap_or_default(),
            soil_type: self.soil.as_ref().and_then(|s| s.soil_type.clone()),
            season: InputSummary::season_or_default(self.season.as_deref()),
        }
    }
}
