//! Boundary validation for advisory requests
//!
//! Required-field checks run in a fixed order (crop, location, soil) and
//! report the first missing field with a farmer-facing message. Range checks
//! on numeric soil and coordinate values run afterwards.

use thiserror::Error;
use validator::Validate;

use crate::types::{CropInput, LocationInput, SoilInput};

/// A request field that is missing or out of range
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Require `crop.name`
pub fn require_crop_name(crop: Option<&CropInput>, message: &str) -> Result<(), ValidationError> {
    match crop.and_then(|c| c.name.as_ref()) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("crop.name", message)),
    }
}

/// Require a location naming a city, a state or a full coordinate pair
pub fn require_location(
    location: Option<&LocationInput>,
    message: &str,
) -> Result<(), ValidationError> {
    match location {
        Some(location) if location.is_identifiable() => Ok(()),
        _ => Err(ValidationError::new("location", message)),
    }
}

/// Require `soil.type`
pub fn require_soil_type(soil: Option<&SoilInput>, message: &str) -> Result<(), ValidationError> {
    match soil.and_then(|s| s.soil_type.as_ref()) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("soil.type", message)),
    }
}

/// Reject coordinates outside the valid latitude/longitude ranges
pub fn check_coordinates(location: Option<&LocationInput>) -> Result<(), ValidationError> {
    let Some(location) = location else {
        return Ok(());
    };

    if let Some(lat) = location.lat {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::new(
                "location.lat",
                "Latitude must be between -90 and 90.",
            ));
        }
    }
    if let Some(lon) = location.lon {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ValidationError::new(
                "location.lon",
                "Longitude must be between -180 and 180.",
            ));
        }
    }
    Ok(())
}

/// Reject soil readings outside their physical ranges
pub fn check_soil_ranges(soil: Option<&SoilInput>) -> Result<(), ValidationError> {
    let Some(soil) = soil else {
        return Ok(());
    };

    soil.validate().map_err(|errors| {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        // First failing field in name order keeps the message stable
        fields.sort_by_key(|(field, _)| *field);

        fields
            .into_iter()
            .find_map(|(field, errs)| {
                errs.first().map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for soil.{}.", field));
                    ValidationError::new(format!("soil.{}", field), message)
                })
            })
            .unwrap_or_else(|| ValidationError::new("soil", "Invalid soil data."))
    })
}
