//! Validation utilities for the FarmLink platform

use rust_decimal::Decimal;

use crate::models::PhRange;
use crate::types::GeoPoint;

// ============================================================================
// Farmland & Crop Validations
// ============================================================================

/// Validate a `[longitude, latitude]` pair
pub fn validate_coordinates(coordinates: &[Decimal]) -> Result<GeoPoint, &'static str> {
    let [longitude, latitude] = coordinates else {
        return Err(
            "Invalid location format. Coordinates should be an array [longitude, latitude].",
        );
    };

    if longitude.abs() > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    if latitude.abs() > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }

    Ok(GeoPoint::new(*longitude, *latitude))
}

/// Validate soil pH is on the 0-14 scale
pub fn validate_ph(ph: Decimal) -> Result<(), &'static str> {
    if ph < Decimal::ZERO || ph > Decimal::from(14) {
        return Err("pH must be between 0 and 14");
    }
    Ok(())
}

/// Validate a crop's ideal pH range
pub fn validate_ph_range(range: &PhRange) -> Result<(), &'static str> {
    validate_ph(range.min)?;
    validate_ph(range.max)?;
    if range.min > range.max {
        return Err("pH range minimum cannot exceed maximum");
    }
    Ok(())
}

/// Validate an irrigation duration in minutes
pub fn validate_duration_minutes(duration: i32) -> Result<(), &'static str> {
    if duration <= 0 {
        return Err("Duration must be a positive number of minutes");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate free text such as post or comment content is not blank
pub fn validate_content(content: &str) -> Result<(), &'static str> {
    if content.trim().is_empty() {
        return Err("Content is required");
    }
    Ok(())
}
