//! Farmland models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{GeoPoint, SoilType};

/// Soil nutrient levels (N, P, K)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrients {
    pub nitrogen: Decimal,
    pub phosphorus: Decimal,
    pub potassium: Decimal,
}

/// Measured soil properties of a farmland
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilProperties {
    pub soil_type: SoilType,
    #[serde(rename = "pH")]
    pub ph: Decimal,
    #[serde(default)]
    pub organic_matter: Decimal,
    #[serde(default)]
    pub nutrients: Nutrients,
}

/// Observed climate of a farmland. Every reading is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FarmlandClimate {
    pub avg_temperature: Option<Decimal>,
    pub rainfall: Option<Decimal>,
    pub humidity: Option<Decimal>,
}

/// The soil and climate attributes that crop scoring and crop advice work on.
///
/// Two farmlands with equal snapshots get the same recommendations, which is
/// what lets the advice cache be shared across records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmlandSnapshot {
    pub soil_properties: SoilProperties,
    pub climate: FarmlandClimate,
}

/// A registered farmland
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farmland {
    pub id: Uuid,
    pub name: String,
    pub location: GeoPoint,
    pub soil_properties: SoilProperties,
    pub climate: FarmlandClimate,
    pub current_crop: Option<Uuid>,
    pub crop_history: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Farmland {
    pub fn snapshot(&self) -> FarmlandSnapshot {
        FarmlandSnapshot {
            soil_properties: self.soil_properties.clone(),
            climate: self.climate.clone(),
        }
    }
}
