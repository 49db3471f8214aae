//! WebAssembly module for Smart Kisaan
//!
//! Lets the farmer-facing forms run the same checks as the server before a
//! request is sent:
//! - Request validation with the server's messages
//! - Prompt preview for a request and optional weather snapshot

use shared::{
    Advisory, CropRecommendRequest, Feature, IrrigationPlanRequest, PriceForecastRequest,
    RiskAnalyzeRequest, WeatherSnapshot, YieldPredictRequest,
};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Call `$func::<Request>` for the request type of `$feature`
macro_rules! dispatch {
    ($feature:expr, $func:ident ( $($arg:expr),* )) => {
        match $feature {
            Feature::CropRecommendation => $func::<CropRecommendRequest>($($arg),*),
            Feature::IrrigationPlan => $func::<IrrigationPlanRequest>($($arg),*),
            Feature::YieldPrediction => $func::<YieldPredictRequest>($($arg),*),
            Feature::PriceForecast => $func::<PriceForecastRequest>($($arg),*),
            Feature::RiskAnalysis => $func::<RiskAnalyzeRequest>($($arg),*),
        }
    };
}

fn parse<A: Advisory>(request_json: &str) -> Result<A, String> {
    serde_json::from_str(request_json).map_err(|e| format!("Invalid request JSON: {}", e))
}

fn first_error<A: Advisory>(request_json: &str) -> Result<Option<String>, String> {
    Ok(parse::<A>(request_json)?.validate().err().map(|e| e.message))
}

fn render<A: Advisory>(
    request_json: &str,
    weather: Option<&WeatherSnapshot>,
) -> Result<String, String> {
    Ok(parse::<A>(request_json)?.build_prompt(weather))
}

/// First validation message for a request, `None` when it would be accepted
pub fn validation_error(feature: &str, request_json: &str) -> Result<Option<String>, String> {
    let feature: Feature = feature.parse()?;
    dispatch!(feature, first_error(request_json))
}

/// User message the server would send to the model for this request
pub fn prompt_preview(
    feature: &str,
    request_json: &str,
    weather_json: Option<&str>,
) -> Result<String, String> {
    let feature: Feature = feature.parse()?;
    let weather = weather_json
        .map(serde_json::from_str::<WeatherSnapshot>)
        .transpose()
        .map_err(|e| format!("Invalid weather JSON: {}", e))?;
    dispatch!(feature, render(request_json, weather.as_ref()))
}

/// Validate a request. Resolves to the first error message, or `undefined`
/// when the request is valid.
#[wasm_bindgen(js_name = validateRequest)]
pub fn validate_request(feature: &str, request_json: &str) -> Result<Option<String>, JsValue> {
    validation_error(feature, request_json).map_err(|e| {
        web_sys::console::warn_1(&JsValue::from_str(&e));
        JsValue::from_str(&e)
    })
}

/// Render the prompt preview for a request
#[wasm_bindgen(js_name = previewPrompt)]
pub fn preview_prompt(
    feature: &str,
    request_json: &str,
    weather_json: Option<String>,
) -> Result<String, JsValue> {
    prompt_preview(feature, request_json, weather_json.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Message shown when a feature fails on the server
#[wasm_bindgen(js_name = failureMessage)]
pub fn failure_message(feature: &str) -> Result<String, JsValue> {
    feature
        .parse::<Feature>()
        .map(|f| f.failure_message().to_string())
        .map_err(|e| JsValue::from_str(&e))
}

/// Feature slugs accepted by the functions above
#[wasm_bindgen(js_name = supportedFeatures)]
pub fn supported_features() -> js_sys::Array {
    Feature::ALL
        .iter()
        .map(|f| JsValue::from_str(f.slug()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_match_server() {
        assert_eq!(
            validation_error("risk", r#"{"crop": {"name": "wheat"}, "location": {"city": "Hisar"}}"#)
                .unwrap()
                .as_deref(),
            Some("Soil type is required.")
        );
        assert_eq!(
            validation_error("irrigation", r#"{"location": {"city": "Hisar"}}"#)
                .unwrap()
                .as_deref(),
            Some("Crop data is required. At minimum, provide crop name.")
        );
        assert_eq!(
            validation_error("price", r#"{"crop": {"name": "onion"}, "location": {"state": "Maharashtra"}}"#)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_unknown_feature_and_bad_json() {
        assert_eq!(
            validation_error("fertilizer", "{}").unwrap_err(),
            "Unknown feature: fertilizer"
        );
        assert!(validation_error("crop", "{not json")
            .unwrap_err()
            .starts_with("Invalid request JSON"));
    }

    #[test]
    fn test_prompt_preview_with_weather() {
        let request = r#"{"location": {"city": "Nashik"}, "soil": {"type": "black"}}"#;
        let weather = r#"{"temperature": 29.5, "feelsLike": 31.0, "humidity": 62, "pressure": 1007,
            "windSpeed": 4.2, "clouds": 20, "rainfall": 0.0}"#;

        let without = prompt_preview("crop", request, None).unwrap();
        assert!(!without.contains("Current Weather"));

        let with = prompt_preview("crop", request, Some(weather)).unwrap();
        assert!(with.contains("- Temperature: 29.5°C"));
        assert!(with.contains("- Soil Type: black"));
    }

    #[test]
    fn test_prompt_preview_rejects_bad_weather() {
        let err = prompt_preview("crop", "{}", Some("[]")).unwrap_err();
        assert!(err.starts_with("Invalid weather JSON"));
    }
}
