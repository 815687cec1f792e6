//! Farmland records service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{
    validate_coordinates, validate_ph, Farmland, FarmlandClimate, FarmlandSnapshot, GeoJsonPoint,
    GeoPoint, Nutrients, SoilProperties, SoilType,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Farmland service
#[derive(Clone)]
pub struct FarmlandService {
    db: PgPool,
}

/// Soil properties as sent by clients, before the soil type is checked
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilPropertiesInput {
    pub soil_type: String,
    #[serde(rename = "pH")]
    pub ph: Decimal,
    #[serde(default)]
    pub organic_matter: Decimal,
    #[serde(default)]
    pub nutrients: Nutrients,
}

impl SoilPropertiesInput {
    pub fn validate(self) -> AppResult<SoilProperties> {
        let soil_type: SoilType = self
            .soil_type
            .parse()
            .map_err(|msg: &str| AppError::Validation(msg.to_string()))?;
        validate_ph(self.ph).map_err(|msg| AppError::Validation(msg.to_string()))?;

        Ok(SoilProperties {
            soil_type,
            ph: self.ph,
            organic_matter: self.organic_matter,
            nutrients: self.nutrients,
        })
    }
}

/// Build a snapshot from the optional body fields of a recommendation request
pub fn snapshot_from_input(
    soil_properties: Option<SoilPropertiesInput>,
    climate: Option<FarmlandClimate>,
) -> Option<AppResult<FarmlandSnapshot>> {
    let (soil, climate) = soil_properties.zip(climate)?;
    Some(soil.validate().map(|soil_properties| FarmlandSnapshot {
        soil_properties,
        climate,
    }))
}

/// Input for adding a farmland
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFarmlandInput {
    pub name: Option<String>,
    pub location: Option<GeoJsonPoint>,
    pub soil_properties: Option<SoilPropertiesInput>,
    pub climate: Option<FarmlandClimate>,
    pub current_crop: Option<Uuid>,
    pub crop_history: Option<Vec<Uuid>>,
}

/// Farmland with all input checks passed
#[derive(Debug, Clone)]
pub struct NewFarmland {
    pub name: String,
    pub location: GeoPoint,
    pub soil_properties: SoilProperties,
    pub climate: FarmlandClimate,
    pub current_crop: Option<Uuid>,
    pub crop_history: Vec<Uuid>,
}

impl AddFarmlandInput {
    pub fn validate(self) -> AppResult<NewFarmland> {
        let (Some(name), Some(location), Some(soil_properties), Some(climate)) =
            (self.name, self.location, self.soil_properties, self.climate)
        else {
            return Err(AppError::Validation(
                "Please provide all required fields: name, location, soilProperties, and climate."
                    .to_string(),
            ));
        };

        if name.trim().is_empty() {
            return Err(AppError::Validation("Farmland name is required".to_string()));
        }

        let location = validate_coordinates(&location.coordinates)
            .map_err(|msg| AppError::Validation(msg.to_string()))?;

        Ok(NewFarmland {
            name,
            location,
            soil_properties: soil_properties.validate()?,
            climate,
            current_crop: self.current_crop,
            crop_history: self.crop_history.unwrap_or_default(),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FarmlandRow {
    id: Uuid,
    name: String,
    longitude: Decimal,
    latitude: Decimal,
    soil_type: String,
    ph: Decimal,
    organic_matter: Decimal,
    nitrogen: Decimal,
    phosphorus: Decimal,
    potassium: Decimal,
    avg_temperature: Option<Decimal>,
    rainfall: Option<Decimal>,
    humidity: Option<Decimal>,
    current_crop: Option<Uuid>,
    crop_history: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<FarmlandRow> for Farmland {
    type Error = AppError;

    fn try_from(row: FarmlandRow) -> Result<Self, Self::Error> {
        let soil_type = row.soil_type.parse().map_err(|_| {
            AppError::Internal(format!("Unknown soil type '{}' in farmland {}", row.soil_type, row.id))
        })?;

        Ok(Farmland {
            id: row.id,
            name: row.name,
            location: GeoPoint::new(row.longitude, row.latitude),
            soil_properties: SoilProperties {
                soil_type,
                ph: row.ph,
                organic_matter: row.organic_matter,
                nutrients: Nutrients {
                    nitrogen: row.nitrogen,
                    phosphorus: row.phosphorus,
                    potassium: row.potassium,
                },
            },
            climate: FarmlandClimate {
                avg_temperature: row.avg_temperature,
                rainfall: row.rainfall,
                humidity: row.humidity,
            },
            current_crop: row.current_crop,
            crop_history: row.crop_history,
            created_at: row.created_at,
        })
    }
}

const FARMLAND_COLUMNS: &str = "id, name, longitude, latitude, soil_type, ph, organic_matter, \
     nitrogen, phosphorus, potassium, avg_temperature, rainfall, humidity, current_crop, \
     crop_history, created_at";

impl FarmlandService {
    /// Create a new FarmlandService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Persist a validated farmland
    pub async fn add_farmland(&self, input: NewFarmland) -> AppResult<Farmland> {
        let soil = &input.soil_properties;
        let row = sqlx::query_as::<_, FarmlandRow>(&format!(
            r#"
            INSERT INTO farmlands (
                name, longitude, latitude, soil_type, ph, organic_matter,
                nitrogen, phosphorus, potassium, avg_temperature, rainfall, humidity,
                current_crop, crop_history
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            FARMLAND_COLUMNS
        ))
        .bind(&input.name)
        .bind(input.location.longitude)
        .bind(input.location.latitude)
        .bind(soil.soil_type.as_str())
        .bind(soil.ph)
        .bind(soil.organic_matter)
        .bind(soil.nutrients.nitrogen)
        .bind(soil.nutrients.phosphorus)
        .bind(soil.nutrients.potassium)
        .bind(input.climate.avg_temperature)
        .bind(input.climate.rainfall)
        .bind(input.climate.humidity)
        .bind(input.current_crop)
        .bind(&input.crop_history)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(farmland_id = %row.id, "farmland added");
        row.try_into()
    }

    /// Get a farmland by ID
    pub async fn get_farmland(&self, id: Uuid) -> AppResult<Farmland> {
        let row = sqlx::query_as::<_, FarmlandRow>(&format!(
            "SELECT {} FROM farmlands WHERE id = $1",
            FARMLAND_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Farmland".to_string()))?;

        row.try_into()
    }
}
