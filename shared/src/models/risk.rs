//! Risk analysis request

use serde::{Deserialize, Serialize};

use crate::advisory::{Advisory, Feature};
use crate::fields;
use crate::prompts::{build_risk_analyzer_prompt, RISK_ANALYZER_SYSTEM_PROMPT};
use crate::types::{CropInput, InputSummary, LocationInput, SoilInput, WeatherSnapshot};
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFarmingPractices {
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub irrigation_type: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub pesticides: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub insurance: Option<String>,
}

impl RiskFarmingPractices {
    pub fn is_empty(&self) -> bool {
        self.irrigation_type.is_none() && self.pesticides.is_none() && self.insurance.is_none()
    }
}

/// POST /risk/analyze body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalyzeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil: Option<SoilInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationInput>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub land_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farming_practices: Option<RiskFarmingPractices>,
    /// Free-text worries, one per entry
    #[serde(default, deserialize_with = "fields::text_list::deserialize", skip_serializing_if = "Option::is_none")]
    pub concerns: Option<Vec<String>>,
}

impl Advisory for RiskAnalyzeRequest {
    const FEATURE: Feature = Feature::RiskAnalysis;
    const SYSTEM_PROMPT: &'static str = RISK_ANALYZER_SYSTEM_PROMPT;

    fn validate(&self) -> Result<(), ValidationError> {
        validation::require_crop_name(self.crop.as_ref(), "Crop name is required.")?;
        validation::require_location(self.location.as_ref(), "Location is required.")?;
        validation::require_soil_type(self.soil.as_ref(), "Soil type is required.")?;
        validation::check_coordinates(self.location.as_ref())?;
        validation::check_soil_ranges(self.soil.as_ref())
    }

    fn location(&self) -> Option<&LocationInput> {
        self.location.as_ref()
    }

    fn build_prompt(&self, weather: Option<&WeatherSnapshot>) -> String {
        build_risk_analyzer_prompt(self, weather)
    }

    fn input_summary(&self) -> InputSummary {
        InputSummary {
            crop: self.crop.as_ref().and_then(|c| c.name.clone()),
            location: self.location.as_ref().map(LocationInput::label).unwrap_or_default(),
            soil_type: self.soil.as_ref().and_then(|s| s.soil_type.clone()),
            season: InputSummary::season_or_default(self.season.as_deref()),
        }
    }
}
