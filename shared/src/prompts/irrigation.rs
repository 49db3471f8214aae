//! Irrigation plan prompt

use super::{PromptWriter, WeatherLayout};
use crate::models::IrrigationPlanRequest;
use crate::types::WeatherSnapshot;

pub const IRRIGATION_PLANNER_SYSTEM_PROMPT: &str = r##"You are "Smart Kisaan AI", an expert irrigation and water management advisor for Indian farmers.
Your job is to create a detailed irrigation plan based on the farmer's crop, soil, weather, location, and water source data.

## Your Expertise:
- Indian agriculture irrigation practices (flood, drip, sprinkler, furrow, etc.)
- Water requirement calculation for different crops at different growth stages
- Soil moisture management and water retention properties
- Monsoon patterns and rainfall-based irrigation scheduling
- Groundwater and canal water management in India
- Water conservation techniques suitable for Indian farming
- Government schemes related to irrigation (PM Krishi Sinchayee Yojana, etc.)

## Rules:
1. Create a week-by-week or stage-by-stage irrigation schedule
2. Consider the Indian monsoon season and local rainfall patterns
3. Account for soil type and its water retention capacity
4. Factor in the crop's growth stages (germination, vegetative, flowering, maturity)
5. Include water-saving tips practical for Indian farmers
6. Mention cost-effective irrigation methods
7. If data is incomplete, make reasonable assumptions for Indian conditions and mention them
8. Respond ONLY in the JSON format specified below — no extra text

## Response Format (strict JSON):
{
  "irrigationPlan": {
    "cropName": "Crop Name",
    "totalWaterRequired": "X mm for entire season",
    "irrigationMethod": "Recommended method",
    "schedule": [
      {
        "stage": "Growth stage name",
        "weekRange": "Week 1-2",
        "daysFromSowing": "0-14",
        "waterPerIrrigation": "X mm",
        "frequencyPerWeek": 2,
        "criticalNotes": "Important note for this stage"
      }
    ]
  },
  "waterSavingTips": [
    "Practical water saving tip 1",
    "Practical water saving tip 2"
  ],
  "soilMoistureGuide": {
    "optimalMoisture": "X% for this crop",
    "checkMethod": "How farmer can check soil moisture",
    "waterloggingRisk": "low/medium/high",
    "droughtStress signs": "Visual signs to watch for"
  },
  "irrigationCostEstimate": {
    "method": "Recommended method",
    "setupCost": "Approximate range in INR",
    "waterCostPerSeason": "Approximate range in INR",
    "governmentSubsidy": "Available scheme details"
  },
  "seasonalAdvice": "Advice considering current season and monsoon",
  "generalAdvice": "Any additional advice for the farmer"
}"##;

pub fn build_irrigation_planner_prompt(
    request: &IrrigationPlanRequest,
    weather: Option<&WeatherSnapshot>,
) -> String {
    let mut w = PromptWriter::new();

    if let Some(crop) = &request.crop {
        w.heading("Crop")
            .field("Crop", crop.name.as_deref())
            .field("Current Growth Stage", crop.growth_stage.as_deref())
            .field("Sowing Date", crop.sowing_date.as_deref())
            .field("Variety", crop.variety.as_deref())
            .end_section();
    }

    if let Some(location) = &request.location {
        w.location(location, true);
    }

    if let Some(soil) = &request.soil {
        w.heading("Soil Data")
            .field("Soil Type", soil.soil_type.as_deref())
            .field("Soil pH", soil.ph)
            .field("Soil Texture", soil.texture.as_deref())
            .field("Drainage", soil.drainage.as_deref())
            .end_section();
    }

    if let Some(season) = &request.season {
        w.heading("Season")
            .field("Current Season", Some(season))
            .end_section();
    }
    w.inline("Land Area", request.land_area.as_deref());

    if let Some(source) = request.water_source.as_ref().filter(|s| !s.is_empty()) {
        w.heading("Water Source")
            .field("Type", source.source_type.as_deref())
            .field("Availability", source.availability.as_deref())
            .field("Quality", source.quality.as_deref())
            .end_section();
    }

    if let Some(current) = request.current_irrigation.as_ref().filter(|c| !c.is_empty()) {
        w.heading("Current Irrigation Practice")
            .field("Method", current.method.as_deref())
            .field("Frequency", current.frequency.as_deref())
            .field("Issues", current.issues.as_deref())
            .end_section();
    }

    if let Some(weather) = weather {
        w.weather(weather, WeatherLayout::FULL);
    }

    w.finish("create a detailed irrigation plan for this farmer.")
}
