//! Prompt templates for the advisory features
//!
//! Each feature has a fixed system prompt and a builder that renders the
//! farmer's data as a heading-structured markdown document. Builders are pure:
//! they render only the fields that are present, in a fixed order, and never
//! validate.

use std::fmt::{Display, Write};

use crate::types::{LocationInput, WeatherSnapshot};

pub mod crop;
pub mod irrigation;
pub mod price;
pub mod risk;
pub mod yield_prediction;

pub use crop::{build_crop_recommender_prompt, CROP_RECOMMENDER_SYSTEM_PROMPT};
pub use irrigation::{build_irrigation_planner_prompt, IRRIGATION_PLANNER_SYSTEM_PROMPT};
pub use price::{build_price_forecaster_prompt, PRICE_FORECASTER_SYSTEM_PROMPT};
pub use risk::{build_risk_analyzer_prompt, RISK_ANALYZER_SYSTEM_PROMPT};
pub use yield_prediction::{build_yield_predictor_prompt, YIELD_PREDICTOR_SYSTEM_PROMPT};

/// Closing sentence shared by every user message
const JSON_ONLY: &str = "Respond in the specified JSON format only.";

/// Incremental writer for the user message document
pub(crate) struct PromptWriter {
    buf: String,
}

impl PromptWriter {
    pub fn new() -> Self {
        Self {
            buf: String::from("## Farmer's Data:\n\n"),
        }
    }

    /// `### Title:` heading line
    pub fn heading(&mut self, title: &str) -> &mut Self {
        let _ = writeln!(self.buf, "### {}:", title);
        self
    }

    /// `- Label: value` line, skipped when the value is absent
    pub fn field<T: Display>(&mut self, label: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            let _ = writeln!(self.buf, "- {}: {}", label, value);
        }
        self
    }

    /// `- text` bullet
    pub fn bullet(&mut self, text: &str) -> &mut Self {
        let _ = writeln!(self.buf, "- {}", text);
        self
    }

    /// Single-line section `### Title: value`, skipped when the value is absent
    pub fn inline<T: Display>(&mut self, title: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            let _ = write!(self.buf, "### {}: {}\n\n", title, value);
        }
        self
    }

    /// Blank line closing a section
    pub fn end_section(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub fn location(&mut self, location: &LocationInput, with_coordinates: bool) -> &mut Self {
        self.heading("Location")
            .field("City/Village", location.city.as_deref())
            .field("State", location.state.as_deref())
            .field("District", location.district.as_deref());
        if with_coordinates {
            self.field(
                "Coordinates",
                location
                    .coordinates()
                    .map(|(lat, lon)| format!("{}, {}", lat, lon)),
            );
        }
        self.end_section()
    }

    pub fn weather(&mut self, weather: &WeatherSnapshot, layout: WeatherLayout) -> &mut Self {
        if layout.live {
            self.heading("Current Weather (live data)");
        } else {
            self.heading("Current Weather");
        }

        if layout.feels_like {
            self.field(
                "Temperature",
                Some(format!(
                    "{}°C (Feels like: {}°C)",
                    weather.temperature, weather.feels_like
                )),
            );
        } else {
            self.field("Temperature", Some(format!("{}°C", weather.temperature)));
        }
        self.field("Humidity", Some(format!("{}%", weather.humidity)))
            .field("Weather", weather.description.as_deref());
        if layout.wind {
            self.field("Wind Speed", Some(format!("{} m/s", weather.wind_speed)));
        }
        if layout.clouds {
            self.field("Cloud Cover", Some(format!("{}%", weather.clouds)));
        }
        if layout.rainfall {
            self.field("Recent Rainfall", Some(format!("{} mm", weather.rainfall)));
        }
        if layout.station {
            self.field(
                "Weather Station",
                weather.location_name.as_deref().filter(|s| !s.is_empty()),
            );
        }
        self.end_section()
    }

    /// Append the closing instruction and return the document
    pub fn finish(mut self, task: &str) -> String {
        let _ = write!(self.buf, "Based on ALL the above data, {} {}", task, JSON_ONLY);
        self.buf
    }
}

/// Which weather lines a feature includes in its prompt
#[derive(Debug, Clone, Copy)]
pub(crate) struct WeatherLayout {
    pub live: bool,
    pub feels_like: bool,
    pub wind: bool,
    pub clouds: bool,
    pub rainfall: bool,
    pub station: bool,
}

impl WeatherLayout {
    pub const FULL: WeatherLayout = WeatherLayout {
        live: true,
        feels_like: true,
        wind: true,
        clouds: true,
        rainfall: true,
        station: true,
    };

    pub const BRIEF: WeatherLayout = WeatherLayout {
        live: false,
        feels_like: false,
        wind: false,
        clouds: false,
        rainfall: false,
        station: false,
    };
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_not_rendered() {
        let mut w = PromptWriter::new();
        w.heading("Soil Data")
            .field("Soil Type", Some("Alluvial"))
            .field::<f64>("Soil pH", None)
            .end_section();
        let text = w.finish("recommend.");

        assert!(text.contains("- Soil Type: Alluvial\n"));
        assert!(!text.contains("Soil pH"));
        assert!(text.ends_with("Respond in the specified JSON format only."));
    }

    #[test]
    fn test_weather_full_layout() {
        let mut w = PromptWriter::new();
        w.weather(&fixtures::weather(), WeatherLayout::FULL);
        let text = w.finish("go.");

        assert!(text.contains("### Current Weather (live data):\n"));
        assert!(text.contains("- Temperature: 28°C (Feels like: 30.5°C)\n"));
        assert!(text.contains("- Humidity: 70%\n"));
        assert!(text.contains("- Wind Speed: 3.1 m/s\n"));
        assert!(text.contains("- Cloud Cover: 40%\n"));
        assert!(text.contains("- Recent Rainfall: 0 mm\n"));
        assert!(text.contains("- Weather Station: Lucknow\n"));
    }

    #[test]
    fn test_weather_brief_layout() {
        let mut w = PromptWriter::new();
        w.weather(&fixtures::weather(), WeatherLayout::BRIEF);
        let text = w.finish("go.");

        assert!(text.contains("### Current Weather:\n- Temperature: 28°C\n- Humidity: 70%\n- Weather: haze\n\n"));
        assert!(!text.contains("Wind Speed"));
        assert!(!text.contains("Weather Station"));
    }

    #[test]
    fn test_location_coordinates_optional() {
        let location = LocationInput {
            city: Some("Nagpur".into()),
            lat: Some(21.15),
            lon: Some(79.09),
            ..Default::default()
        };

        let mut w = PromptWriter::new();
        w.location(&location, true);
        assert!(w.finish("x").contains("- Coordinates: 21.15, 79.09\n"));

        let mut w = PromptWriter::new();
        w.location(&location, false);
        assert!(!w.finish("x").contains("Coordinates"));
    }
}
