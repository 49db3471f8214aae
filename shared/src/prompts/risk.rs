//! Risk analysis prompt

use super::{PromptWriter, WeatherLayout};
use crate::models::RiskAnalyzeRequest;
use crate::types::WeatherSnapshot;

pub const RISK_ANALYZER_SYSTEM_PROMPT: &str = r##"You are "Smart Kisaan AI", an expert agricultural risk assessment advisor for Indian farmers.
Your job is to analyze all potential risks to the farmer's crop and provide mitigation strategies.

## Your Expertise:
- Pest and disease risks for Indian crops (region-specific)
- Weather-related risks (drought, flood, hailstorm, unseasonal rain, heat waves)
- Market risks (price crashes, demand shifts, oversupply)
- Soil degradation and nutrient deficiency risks
- Water scarcity and irrigation failure risks
- Government policy changes affecting farming
- Crop insurance schemes (PMFBY - Pradhan Mantri Fasal Bima Yojana)
- Climate change impact on Indian agriculture
- Post-harvest losses and storage risks

## Rules:
1. Analyze ALL categories of risk: pest/disease, weather, market, soil, water, financial
2. Rate each risk by severity and likelihood
3. Provide specific, actionable mitigation strategies for each risk
4. Consider the specific Indian state/region and its known risks
5. Mention relevant crop insurance and government protection schemes
6. Factor in current weather conditions
7. Include early warning signs the farmer should watch for
8. If data is incomplete, assess based on common risks for the crop/region and mention assumptions
9. Respond ONLY in the JSON format specified below — no extra text

## Response Format (strict JSON):
{
  "riskAssessment": {
    "overallRiskLevel": "low/moderate/high/critical",
    "riskScore": 65,
    "cropName": "Crop Name",
    "cropNameHindi": "फसल का नाम"
  },
  "risks": [
    {
      "category": "pest/disease/weather/market/soil/water/financial",
      "riskName": "Specific risk name",
      "riskNameHindi": "जोखिम का नाम",
      "severity": "low/medium/high/critical",
      "likelihood": "unlikely/possible/likely/very_likely",
      "timeframe": "immediate/short_term/medium_term/long_term",
      "description": "What could happen",
      "earlyWarningSigns": ["Sign 1", "Sign 2"],
      "mitigation": [
        {
          "action": "What to do",
          "cost": "Low/Medium/High",
          "effectiveness": "high/medium/low"
        }
      ]
    }
  ],
  "insuranceAdvice": {
    "recommended": true,
    "scheme": "PMFBY or relevant scheme",
    "coverage": "What it covers",
    "premium": "Approximate premium",
    "enrollmentDeadline": "When to enroll",
    "howToEnroll": "Steps to enroll"
  },
  "emergencyPlan": {
    "pestOutbreak": "Immediate steps",
    "drought": "Immediate steps",
    "flood": "Immediate steps",
    "pricecrash": "Immediate steps"
  },
  "seasonalAlerts": ["Alert 1 for this season", "Alert 2"],
  "generalAdvice": "Overall risk management advice"
}"##;

const WEATHER: WeatherLayout = WeatherLayout {
    station: false,
    ..WeatherLayout::FULL
};

pub fn build_risk_analyzer_prompt(
    request: &RiskAnalyzeRequest,
    weather: Option<&WeatherSnapshot>,
) -> String {
    let mut w = PromptWriter::new();

    if let Some(crop) = &request.crop {
        w.heading("Crop")
            .field("Crop", crop.name.as_deref())
            .field("Variety", crop.variety.as_deref())
            .field("Sowing Date", crop.sowing_date.as_deref())
            .field("Current Growth Stage", crop.growth_stage.as_deref())
            .field(
                "Investment So Far",
                crop.investment_so_far.as_ref().map(|amount| format!("₹{}", amount)),
            )
            .end_section();
    }

    if let Some(location) = &request.location {
        w.location(location, true);
    }

    if let Some(soil) = &request.soil {
        w.heading("Soil Data")
            .field("Soil Type", soil.soil_type.as_deref())
            .field("Soil pH", soil.ph)
            .field("Drainage", soil.drainage.as_deref())
            .end_section();
    }

    w.inline("Season", request.season.as_deref())
        .inline("Land Area", request.land_area.as_deref());

    if let Some(practices) = request.farming_practices.as_ref().filter(|p| !p.is_empty()) {
        w.heading("Farming Practices")
            .field("Irrigation", practices.irrigation_type.as_deref())
            .field("Pesticide Use", practices.pesticides.as_deref())
            .field("Has Crop Insurance", practices.insurance.as_deref())
            .end_section();
    }

    if let Some(concerns) = &request.concerns {
        w.heading("Farmer's Specific Concerns");
        for concern in concerns {
            w.bullet(concern);
        }
        w.end_section();
    }

    if let Some(weather) = weather {
        w.weather(weather, WEATHER);
    }

    w.finish("perform a comprehensive risk analysis for this farmer.")
}
