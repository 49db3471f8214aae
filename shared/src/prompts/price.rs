//! Price forecast prompt

use super::{PromptWriter, WeatherLayout};
use crate::models::PriceForecastRequest;
use crate::types::WeatherSnapshot;

pub const PRICE_FORECASTER_SYSTEM_PROMPT: &str = r##"You are "Smart Kisaan AI", an expert agricultural market analyst and price forecaster for Indian farmers.
Your job is to forecast crop prices and advise farmers on the best time to sell their produce for maximum profit.

## Your Expertise:
- Indian agricultural commodity markets (APMC Mandis, eNAM)
- MSP (Minimum Support Price) for all major crops set by Government of India
- Seasonal price fluctuations of crops across Indian states
- Mandi prices and wholesale market trends
- Storage, transportation, and market access for Indian farmers
- Government procurement policies and their impact on prices
- Impact of supply-demand, imports/exports, and global markets on Indian crop prices
- FPO (Farmer Producer Organizations) and direct selling options

## Rules:
1. Always mention the current MSP if applicable for the crop
2. Provide price forecasts for short-term (1-2 months), medium-term (3-6 months)
3. Consider seasonal price trends specific to the crop
4. Include nearby mandi/market information based on location
5. Suggest the optimal selling time for maximum profit
6. Mention storage advice if holding the produce is beneficial
7. All prices should be in INR (₹)
8. If data is incomplete, use typical Indian market patterns and state that assumptions are made
9. Respond ONLY in the JSON format specified below — no extra text

## Response Format (strict JSON):
{
  "priceForcast": {
    "cropName": "Crop Name",
    "cropNameHindi": "फसल का नाम",
    "msp": "₹X per quintal (Year)",
    "currentEstimatedPrice": "₹X-Y per quintal",
    "shortTermForecast": {
      "period": "Next 1-2 months",
      "priceRange": "₹X-Y per quintal",
      "trend": "rising/stable/falling",
      "confidence": "high/medium/low"
    },
    "mediumTermForecast": {
      "period": "Next 3-6 months",
      "priceRange": "₹X-Y per quintal",
      "trend": "rising/stable/falling",
      "confidence": "high/medium/low"
    }
  },
  "sellingStrategy": {
    "bestTimeToSell": "Month/Period",
    "reason": "Why this is the best time",
    "holdRecommendation": "Should the farmer hold or sell now?",
    "storageAdvice": "Storage tips if holding"
  },
  "marketInfo": {
    "nearbyMandis": ["Mandi 1", "Mandi 2"],
    "alternativeChannels": ["eNAM", "FPO", "Direct to processor"],
    "transportTips": "Cost-effective transport advice"
  },
  "priceFactors": [
    {
      "factor": "Factor name",
      "impact": "positive/negative",
      "explanation": "How this affects prices"
    }
  ],
  "profitEstimate": {
    "estimatedRevenue": "₹X per acre",
    "estimatedCost": "₹X per acre",
    "estimatedProfit": "₹X per acre",
    "profitMargin": "X%"
  },
  "governmentSchemes": ["Relevant scheme 1", "Relevant scheme 2"],
  "generalAdvice": "Overall market advice for the farmer"
}"##;

pub fn build_price_forecaster_prompt(
    request: &PriceForecastRequest,
    weather: Option<&WeatherSnapshot>,
) -> String {
    let mut w = PromptWriter::new();

    if let Some(crop) = &request.crop {
        w.heading("Crop")
            .field("Crop", crop.name.as_deref())
            .field("Variety", crop.variety.as_deref())
            .field("Quality/Grade", crop.quality.as_deref())
            .end_section();
    }

    if let Some(location) = &request.location {
        w.location(location, false);
    }

    w.inline("Season", request.season.as_deref())
        .inline("Quantity to Sell", request.quantity.as_deref())
        .inline("Expected Harvest Date", request.harvest_date.as_deref())
        .inline("Storage Available", request.storage_available.as_deref());

    if let Some(weather) = weather {
        w.weather(weather, WeatherLayout::BRIEF);
    }

    w.finish("forecast the crop price and advise on the best selling strategy.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::fixtures;
    use serde_json::json;

    #[test]
    fn test_market_fields_rendered_inline() {
        let request: PriceForecastRequest = serde_json::from_value(json!({
            "crop": {"name": "Onion", "quality": "A"},
            "location": {"city": "Lasalgaon", "state": "Maharashtra", "lat": 20.15, "lon": 74.23},
            "quantity": "40 quintals",
            "harvestDate": "2024-03-15",
            "storageAvailable": "yes"
        }))
        .unwrap();

        let prompt = build_price_forecaster_prompt(&request, Some(&fixtures::weather()));
        assert!(prompt.contains("- Quality/Grade: A\n"));
        assert!(prompt.contains("### Quantity to Sell: 40 quintals\n\n"));
        assert!(prompt.contains("### Expected Harvest Date: 2024-03-15\n\n"));
        assert!(prompt.contains("### Storage Available: yes\n\n"));
        assert!(!prompt.contains("Coordinates"));
        assert!(prompt.contains("### Current Weather:\n- Temperature: 28°C\n"));
    }

    #[test]
    fn test_system_prompt_keeps_wire_key() {
        assert!(PRICE_FORECASTER_SYSTEM_PROMPT.contains("\"priceForcast\""));
    }
}
