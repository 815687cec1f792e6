//! Crop catalog models

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::types::SoilType;

/// Acceptable soil pH for a crop, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PhRange {
    pub fn contains(&self, ph: Decimal) -> bool {
        ph >= self.min && ph <= self.max
    }
}

/// Minimum soil nutrient levels a crop needs.
///
/// Values are kept as entered (`"40"`, `"40 kg/ha"`); see [`parse_requirement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientRequirement {
    #[serde(deserialize_with = "string_or_number")]
    pub nitrogen: String,
    #[serde(deserialize_with = "string_or_number")]
    pub phosphorus: String,
    #[serde(deserialize_with = "string_or_number")]
    pub potassium: String,
}

/// Ideal temperature window; a missing bound means no constraint on that side
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

/// Climate a crop grows best in. `None` means the crop has no requirement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CropClimate {
    pub ideal_temperature: TemperatureRange,
    pub rainfall: Option<Decimal>,
    pub humidity: Option<Decimal>,
}

/// A crop in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub id: Uuid,
    pub name: String,
    pub ideal_soil_type: SoilType,
    #[serde(rename = "idealpHRange")]
    pub ideal_ph_range: PhRange,
    pub water_requirement: String,
    pub nutrient_requirement: NutrientRequirement,
    #[serde(default)]
    pub climate: CropClimate,
}

/// Parse a nutrient requirement the way it is entered in the catalog: the
/// leading integer counts, anything after it is ignored.
///
/// Returns `None` when the value does not start with a number.
pub fn parse_requirement(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
