//! Irrigation plan request

use serde::{Deserialize, Serialize};

use crate::advisory::{Advisory, Feature};
use crate::fields;
use crate::prompts::{build_irrigation_planner_prompt, IRRIGATION_PLANNER_SYSTEM_PROMPT};
use crate::types::{CropInput, InputSummary, LocationInput, SoilInput, WeatherSnapshot};
use crate::validation::{self, ValidationError};

/// Where irrigation water comes from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterSource {
    #[serde(rename = "type", default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

impl WaterSource {
    pub fn is_empty(&self) -> bool {
        self.source_type.is_none() && self.availability.is_none() && self.quality.is_none()
    }
}

/// How the farmer irrigates today
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentIrrigation {
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "fields::text::deserialize", skip_serializing_if = "Option::is_none")]
    pub issues: Option<String>,
}

impl CurrentIrrigation {
    pub fn is_empty(&self) -> bool {
        self.method.is_none() && self.frequency.is_none() && self.issues.is_none()
    }
}

/// POST /irrigation/plan body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrrigationPlanRequest {
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
    pub water_source: Option<WaterSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_irrigation: Option<CurrentIrrigation>,
}

impl Advisory for IrrigationPlanRequest {
    const FEATURE: Feature = Feature::IrrigationPlan;
    const SYSTEM_PROMPT: &'static str = IRRIGATION_PLANNER_SYSTEM_PROMPT;

    fn validate(&self) -> Result<(), ValidationError> {
        validation::require_crop_name(
            self.crop.as_ref(),
            "Crop data is required. At minimum, provide crop name.",
        )?;
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
        build_irrigation_planner_prompt(self, weather)
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_crop_checked_first() {
        let request: IrrigationPlanRequest = serde_json::from_value(json!({
            "location": {"city": "Nashik"},
            "soil": {"type": "Black"}
        }))
        .unwrap();
        assert_eq!(
            request.validate().unwrap_err().message,
            "Crop data is required. At minimum, provide crop name."
        );
    }

    #[test]
    fn test_summary_echoes_crop_and_soil() {
        let request: IrrigationPlanRequest = serde_json::from_value(json!({
            "crop": {"name": "Sugarcane"},
            "location": {"lat": 19.99, "lon": 73.79},
            "soil": {"type": "Black"},
            "waterSource": {"type": "Canal"}
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        let summary = request.input_summary();
        assert_eq!(summary.crop.as_deref(), Some("Sugarcane"));
        assert_eq!(summary.location, "19.99, 73.79");
        assert_eq!(summary.season, "Not specified");
    }
}
