//! Crop catalog service

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{
    validate_ph_range, Crop, CropClimate, NutrientRequirement, PhRange, SoilType, TemperatureRange,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Read access to the full crop catalog
#[async_trait]
pub trait CropCatalog: Send + Sync {
    /// Every crop, in a stable catalog order
    async fn all_crops(&self) -> AppResult<Vec<Crop>>;
}

/// Crop service backed by PostgreSQL
#[derive(Clone)]
pub struct CropService {
    db: PgPool,
}

/// Input for adding a crop to the catalog
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCropInput {
    pub name: String,
    pub ideal_soil_type: SoilType,
    #[serde(rename = "idealpHRange")]
    pub ideal_ph_range: PhRange,
    pub water_requirement: String,
    pub nutrient_requirement: NutrientRequirement,
    #[serde(default)]
    pub climate: CropClimate,
}

impl AddCropInput {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Crop name is required".to_string()));
        }
        validate_ph_range(&self.ideal_ph_range).map_err(|msg| AppError::Validation(msg.to_string()))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CropRow {
    id: Uuid,
    name: String,
    ideal_soil_type: String,
    ph_min: Decimal,
    ph_max: Decimal,
    water_requirement: String,
    nitrogen_requirement: String,
    phosphorus_requirement: String,
    potassium_requirement: String,
    ideal_temperature_min: Option<Decimal>,
    ideal_temperature_max: Option<Decimal>,
    rainfall: Option<Decimal>,
    humidity: Option<Decimal>,
}

impl TryFrom<CropRow> for Crop {
    type Error = AppError;

    fn try_from(row: CropRow) -> Result<Self, Self::Error> {
        let ideal_soil_type = row.ideal_soil_type.parse().map_err(|_| {
            AppError::Internal(format!(
                "Unknown soil type '{}' in crop {}",
                row.ideal_soil_type, row.id
            ))
        })?;

        Ok(Crop {
            id: row.id,
            name: row.name,
            ideal_soil_type,
            ideal_ph_range: PhRange {
                min: row.ph_min,
                max: row.ph_max,
            },
            water_requirement: row.water_requirement,
            nutrient_requirement: NutrientRequirement {
                nitrogen: row.nitrogen_requirement,
                phosphorus: row.phosphorus_requirement,
                potassium: row.potassium_requirement,
            },
            climate: CropClimate {
                ideal_temperature: TemperatureRange {
                    min: row.ideal_temperature_min,
                    max: row.ideal_temperature_max,
                },
                rainfall: row.rainfall,
                humidity: row.humidity,
            },
        })
    }
}

const CROP_COLUMNS: &str = "id, name, ideal_soil_type, ph_min, ph_max, water_requirement, \
     nitrogen_requirement, phosphorus_requirement, potassium_requirement, \
     ideal_temperature_min, ideal_temperature_max, rainfall, humidity";

impl CropService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Add a crop to the catalog
    pub async fn add_crop(&self, input: AddCropInput) -> AppResult<Crop> {
        input.validate()?;

        let row = sqlx::query_as::<_, CropRow>(&format!(
            r#"
            INSERT INTO crops (
                name, ideal_soil_type, ph_min, ph_max, water_requirement,
                nitrogen_requirement, phosphorus_requirement, potassium_requirement,
                ideal_temperature_min, ideal_temperature_max, rainfall, humidity
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            CROP_COLUMNS
        ))
        .bind(&input.name)
        .bind(input.ideal_soil_type.as_str())
        .bind(input.ideal_ph_range.min)
        .bind(input.ideal_ph_range.max)
        .bind(&input.water_requirement)
        .bind(&input.nutrient_requirement.nitrogen)
        .bind(&input.nutrient_requirement.phosphorus)
        .bind(&input.nutrient_requirement.potassium)
        .bind(input.climate.ideal_temperature.min)
        .bind(input.climate.ideal_temperature.max)
        .bind(input.climate.rainfall)
        .bind(input.climate.humidity)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(crop_id = %row.id, name = %row.name, "crop added to catalog");
        row.try_into()
    }
}

#[async_trait]
impl CropCatalog for CropService {
    async fn all_crops(&self) -> AppResult<Vec<Crop>> {
        let rows = sqlx::query_as::<_, CropRow>(&format!(
            "SELECT {} FROM crops ORDER BY created_at, id",
            CROP_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Crop::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_ph_range_is_rejected() {
        let input: AddCropInput = serde_json::from_value(serde_json::json!({
            "name": "Rice",
            "idealSoilType": "clay",
            "idealpHRange": {"min": 7.0, "max": 5.5},
            "waterRequirement": "high",
            "nutrientRequirement": {"nitrogen": "60", "phosphorus": "30", "potassium": "30"}
        }))
        .unwrap();
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_valid_crop_input() {
        let input: AddCropInput = serde_json::from_value(serde_json::json!({
            "name": "Wheat",
            "idealSoilType": "loamy",
            "idealpHRange": {"min": 6.0, "max": 7.5},
            "waterRequirement": "medium",
            "nutrientRequirement": {"nitrogen": 40, "phosphorus": 20, "potassium": "20 kg/ha"},
            "climate": {"idealTemperature": {"min": 12, "max": 25}, "rainfall": 450}
        }))
        .unwrap();
        assert!(input.validate().is_ok());
        assert_eq!(input.climate.humidity, None);
    }
}
