//! Yield prediction prompt

use super::{PromptWriter, WeatherLayout};
use crate::models::YieldPredictRequest;
use crate::types::WeatherSnapshot;

pub const YIELD_PREDICTOR_SYSTEM_PROMPT: &str = r##"You are "Smart Kisaan AI", an expert crop yield prediction advisor for Indian farmers.
Your job is to predict the expected crop yield based on the farmer's land, soil, weather, farming practices, and historical data.

## Your Expertise:
- Indian crop yield patterns across different states and agro-climatic zones
- Impact of soil quality, fertilizers, and pesticides on yield
- Weather influence on crop productivity (rainfall, temperature, humidity)
- Best farming practices to maximize yield in Indian conditions
- Historical yield data for major Indian crops (rice, wheat, sugarcane, cotton, pulses, etc.)
- Government data on average yields per hectare across Indian states

## Rules:
1. Provide a realistic yield prediction range (minimum, expected, maximum)
2. Base predictions on Indian agricultural data and conditions
3. Consider regional yield averages for the specific state
4. Factor in soil quality, weather, and farming practices
5. Identify key factors that could increase or decrease the predicted yield
6. Provide actionable tips to achieve maximum yield
7. If data is incomplete, use Indian agricultural averages and mention assumptions
8. Respond ONLY in the JSON format specified below — no extra text

## Response Format (strict JSON):
{
  "yieldPrediction": {
    "cropName": "Crop Name",
    "cropNameHindi": "फसल का नाम",
    "predictedYield": {
      "minimum": "X quintals/hectare",
      "expected": "Y quintals/hectare",
      "maximum": "Z quintals/hectare"
    },
    "confidenceLevel": "high/medium/low",
    "stateAverage": "Average yield in this state",
    "nationalAverage": "National average yield"
  },
  "yieldFactors": [
    {
      "factor": "Factor name",
      "impact": "positive/negative/neutral",
      "severity": "high/medium/low",
      "explanation": "How this factor affects yield"
    }
  ],
  "yieldBoostTips": [
    {
      "tip": "Actionable advice",
      "potentialIncrease": "X% increase possible",
      "difficulty": "easy/moderate/hard",
      "costEstimate": "Low/Medium/High"
    }
  ],
  "fertilizerRecommendation": {
    "nitrogen": "X kg/hectare",
    "phosphorus": "X kg/hectare",
    "potassium": "X kg/hectare",
    "organic": "Recommended organic manure",
    "applicationSchedule": "When to apply"
  },
  "riskFactors": ["Risk 1", "Risk 2"],
  "harvestTimeline": {
    "expectedHarvestDate": "Month/Week",
    "maturitySigns": ["Sign 1", "Sign 2"]
  },
  "generalAdvice": "Overall advice for the farmer"
}"##;

const WEATHER: WeatherLayout = WeatherLayout {
    clouds: false,
    station: false,
    ..WeatherLayout::FULL
};

pub fn build_yield_predictor_prompt(
    request: &YieldPredictRequest,
    weather: Option<&WeatherSnapshot>,
) -> String {
    let mut w = PromptWriter::new();

    if let Some(crop) = &request.crop {
        w.heading("Crop")
            .field("Crop", crop.name.as_deref())
            .field("Variety", crop.variety.as_deref())
            .field("Sowing Date", crop.sowing_date.as_deref())
            .field("Current Growth Stage", crop.growth_stage.as_deref())
            .end_section();
    }

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

    w.inline("Season", request.season.as_deref())
        .inline("Land Area", request.land_area.as_deref());

    if let Some(practices) = request.farming_practices.as_ref().filter(|p| !p.is_empty()) {
        w.heading("Farming Practices")
            .field("Irrigation", practices.irrigation_type.as_deref())
            .field("Tillage", practices.tillage.as_deref())
            .field("Pesticide Use", practices.pesticides.as_deref())
            .field("Previous Crop", practices.previous_crop.as_deref())
            .end_section();
    }

    if let Some(fertilizers) = request.fertilizers.as_ref().filter(|f| !f.is_empty()) {
        w.heading("Fertilizers Used")
            .field("Urea", fertilizers.urea.as_deref())
            .field("DAP", fertilizers.dap.as_deref())
            .field("MOP", fertilizers.mop.as_deref())
            .field("Organic", fertilizers.organic.as_deref())
            .end_section();
    }

    if let Some(weather) = weather {
        w.weather(weather, WEATHER);
    }

    w.finish("predict the crop yield for this farmer.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::fixtures;
    use serde_json::json;

    #[test]
    fn test_practices_and_fertilizers() {
        let request: YieldPredictRequest = serde_json::from_value(json!({
            "crop": {"name": "Wheat", "variety": "HD-2967"},
            "location": {"city": "Karnal", "state": "Haryana"},
            "soil": {"type": "Loamy", "nitrogen": 250},
            "season": "Rabi",
            "farmingPractices": {"tillage": "Zero tillage"},
            "fertilizers": {"urea": "100 kg/acre", "dap": "50 kg/acre"}
        }))
        .unwrap();

        let prompt = build_yield_predictor_prompt(&request, None);
        assert!(prompt.contains("### Season: Rabi\n\n"));
        assert!(prompt.contains("### Farming Practices:\n- Tillage: Zero tillage\n\n"));
        assert!(prompt.contains("### Fertilizers Used:\n- Urea: 100 kg/acre\n- DAP: 50 kg/acre\n\n"));
        assert!(!prompt.contains("Land Area"));
    }

    #[test]
    fn test_weather_without_clouds_or_station() {
        let request: YieldPredictRequest = serde_json::from_value(json!({
            "crop": {"name": "Wheat"},
            "location": {"city": "Karnal"},
            "soil": {"type": "Loamy"}
        }))
        .unwrap();

        let prompt = build_yield_predictor_prompt(&request, Some(&fixtures::weather()));
        assert!(prompt.contains("- Temperature: 28°C (Feels like: 30.5°C)\n"));
        assert!(prompt.contains("- Wind Speed: 3.1 m/s\n- Recent Rainfall: 0 mm\n\n"));
        assert!(!prompt.contains("Cloud Cover"));
        assert!(!prompt.contains("Weather Station"));
    }
}
