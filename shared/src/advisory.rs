//! The contract every advisory feature implements
//!
//! A feature is fully described by its request type: how it validates, which
//! location it is about, how it renders the user message, and which fields it
//! echoes back. The backend runs every feature through one generic pipeline
//! over this trait.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use crate::types::{InputSummary, LocationInput, PromptPair, WeatherSnapshot};
use crate::validation::ValidationError;

/// The five advisory features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    CropRecommendation,
    IrrigationPlan,
    YieldPrediction,
    PriceForecast,
    RiskAnalysis,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::CropRecommendation,
        Feature::IrrigationPlan,
        Feature::YieldPrediction,
        Feature::PriceForecast,
        Feature::RiskAnalysis,
    ];

    /// Short identifier used in logs and by the browser bindings
    pub fn slug(&self) -> &'static str {
        match self {
            Feature::CropRecommendation => "crop",
            Feature::IrrigationPlan => "irrigation",
            Feature::YieldPrediction => "yield",
            Feature::PriceForecast => "price",
            Feature::RiskAnalysis => "risk",
        }
    }

    /// Message returned to the farmer when the feature fails for a reason
    /// they cannot act on
    pub fn failure_message(&self) -> &'static str {
        match self {
            Feature::CropRecommendation => "Failed to get crop recommendations.",
            Feature::IrrigationPlan => "Failed to generate irrigation plan.",
            Feature::YieldPrediction => "Failed to predict yield.",
            Feature::PriceForecast => "Failed to forecast price.",
            Feature::RiskAnalysis => "Failed to analyze risks.",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::CropRecommendation => "Crop Recommendation",
            Feature::IrrigationPlan => "Irrigation Plan",
            Feature::YieldPrediction => "Yield Prediction",
            Feature::PriceForecast => "Price Forecast",
            Feature::RiskAnalysis => "Risk Analysis",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.slug() == s)
            .ok_or_else(|| format!("Unknown feature: {}", s))
    }
}

/// A validated-at-the-boundary advisory request
pub trait Advisory: DeserializeOwned + Send + Sync + 'static {
    const FEATURE: Feature;

    /// Fixed instruction text: persona, rules and output schema
    const SYSTEM_PROMPT: &'static str;

    /// Required-field and range checks, first failure wins
    fn validate(&self) -> Result<(), ValidationError>;

    /// Location used for the weather lookup
    fn location(&self) -> Option<&LocationInput>;

    /// Render the farmer's data (and weather, when available) as the user message
    fn build_prompt(&self, weather: Option<&WeatherSnapshot>) -> String;

    /// Fields echoed back next to the advice
    fn input_summary(&self) -> InputSummary;

    fn prompt_pair(&self, weather: Option<&WeatherSnapshot>) -> PromptPair {
        PromptPair {
            system_prompt: Self::SYSTEM_PROMPT,
            user_message: self.build_prompt(weather),
        }
    }
}
