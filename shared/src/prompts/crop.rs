//! Crop recommendation prompt

use super::{PromptWriter, WeatherLayout};
use crate::models::CropRecommendRequest;
use crate::types::WeatherSnapshot;

pub const CROP_RECOMMENDER_SYSTEM_PROMPT: &str = r##"You are "Smart Kisaan AI", an expert agricultural advisor for Indian farmers.
Your job is to recommend the best crops to grow based on the farmer's soil, weather, location, and season data.

## Your Expertise:
- Indian agriculture, cropping patterns, and regional farming practices
- Soil science (pH, NPK levels, soil types)
- Climate and weather impact on crops
- Kharif, Rabi, and Zaid crop seasons
- Water requirements and irrigation methods
- Market demand and profitability of crops in India

## Rules:
1. Always recommend 3-5 crops, ranked by suitability
2. Consider the specific Indian state/region and its traditional crops
3. Factor in current weather conditions if available
4. Provide practical, actionable advice a farmer can use immediately
5. Include estimated yield and growing duration
6. Mention water requirements for each crop
7. If data is incomplete, make reasonable assumptions for Indian agriculture and mention them
8. Respond ONLY in the JSON format specified below — no extra text

## Response Format (strict JSON):
{
  "recommendations": [
    {
      "rank": 1,
      "cropName": "Crop Name",
      "cropNameHindi": "फसल का नाम",
      "suitabilityScore": 95,
      "season": "Kharif/Rabi/Zaid",
      "reasonsToGrow": ["reason 1", "reason 2", "reason 3"],
      "estimatedYield": "X quintals per hectare",
      "growingDuration": "X-Y days",
      "waterRequirement": "low/moderate/high - X mm per season",
      "sowingMonth": "Month name",
      "harvestMonth": "Month name",
      "tips": ["practical tip 1", "practical tip 2"]
    }
  ],
  "soilAnalysis": "Brief analysis of the soil condition and what it's best suited for",
  "weatherImpact": "How current weather affects crop selection",
  "generalAdvice": "Any additional advice for the farmer"
}"##;

pub fn build_crop_recommender_prompt(
    request: &CropRecommendRequest,
    weather: Option<&WeatherSnapshot>,
) -> String {
    let mut w = PromptWriter::new();

    if let Some(location) = &request.location {
        w.location(location, true);
    }

    if let Some(soil) = &request.soil {
        w.heading("Soil Data")
            .field("Soil Type", soil.soil_type.as_deref())
            .field("Soil pH", soil.ph)
            .field("Nitrogen (N)", soil.nitrogen.map(|n| format!("{} kg/ha", n)))
            .field("Phosphorus (P)", soil.phosphorus.map(|p| format!("{} kg/ha", p)))
            .field("Potassium (K)", soil.potassium.map(|k| format!("{} kg/ha", k)))
            .field("Organic Carbon", soil.organic_carbon.map(|oc| format!("{}%", oc)))
            .end_section();
    }

    if let Some(season) = &request.season {
        w.heading("Season")
            .field("Planned season", Some(season))
            .end_section();
    }

    if request.land_area.is_some()
        || request.water_availability.is_some()
        || request.irrigation_type.is_some()
    {
        w.heading("Land & Water")
            .field("Area", request.land_area.as_deref())
            .field("Water Availability", request.water_availability.as_deref())
            .field("Irrigation Type", request.irrigation_type.as_deref())
            .end_section();
    }

    if let Some(weather) = weather {
        w.weather(weather, WeatherLayout::FULL);
    }

    w.finish("recommend the best crops for this farmer.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::fixtures;
    use serde_json::json;

    fn request() -> CropRecommendRequest {
        serde_json::from_value(json!({
            "location": {"city": "Lucknow", "state": "Uttar Pradesh", "lat": 26.85, "lon": 80.95},
            "soil": {"type": "Alluvial", "ph": 6.8, "nitrogen": 280, "organicCarbon": "0.5"},
            "season": "Kharif"
        }))
        .unwrap()
    }

    #[test]
    fn test_sections_in_order() {
        let prompt = build_crop_recommender_prompt(&request(), Some(&fixtures::weather()));

        let location = prompt.find("### Location:").unwrap();
        let soil = prompt.find("### Soil Data:").unwrap();
        let season = prompt.find("### Season:\n- Planned season: Kharif\n\n").unwrap();
        let weather = prompt.find("### Current Weather (live data):").unwrap();
        assert!(location < soil && soil < season && season < weather);

        assert!(prompt.starts_with("## Farmer's Data:\n\n"));
        assert!(prompt.contains("- Coordinates: 26.85, 80.95\n"));
        assert!(prompt.contains("- Nitrogen (N): 280 kg/ha\n"));
        assert!(prompt.contains("- Organic Carbon: 0.5%\n"));
        assert!(prompt.ends_with(
            "Based on ALL the above data, recommend the best crops for this farmer. Respond in the specified JSON format only."
        ));
    }

    #[test]
    fn test_land_and_water_only_when_given() {
        let prompt = build_crop_recommender_prompt(&request(), None);
        assert!(!prompt.contains("Land & Water"));
        assert!(!prompt.contains("Current Weather"));

        let mut with_water = request();
        with_water.irrigation_type = Some("Drip".into());
        let prompt = build_crop_recommender_prompt(&with_water, None);
        assert!(prompt.contains("### Land & Water:\n- Irrigation Type: Drip\n\n"));
        assert!(!prompt.contains("- Area:"));
    }

    #[test]
    fn test_system_prompt_names_output_keys() {
        for key in ["\"recommendations\"", "\"soilAnalysis\"", "\"weatherImpact\"", "\"generalAdvice\""] {
            assert!(CROP_RECOMMENDER_SYSTEM_PROMPT.contains(key), "missing {}", key);
        }
    }
}
