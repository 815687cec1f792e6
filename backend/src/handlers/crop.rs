//! Crop catalog and crop recommendation handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use shared::{Crop, Farmland, FarmlandClimate, FarmlandSnapshot};

use crate::error::{AppError, AppResult};
use crate::extract::{parse_id, ApiJson};
use crate::services::crop::AddCropInput;
use crate::services::farmland::{snapshot_from_input, SoilPropertiesInput};
use crate::services::{CropCatalog, CropService, FarmlandService, RecommendedCrop};
use crate::AppState;

#[derive(Serialize)]
pub struct CropListResponse {
    pub success: bool,
    pub crops: Vec<Crop>,
}

#[derive(Serialize)]
pub struct CropResponse {
    pub success: bool,
    pub crop: Crop,
}

/// List the crop catalog
pub async fn list_crops(State(state): State<AppState>) -> AppResult<Json<CropListResponse>> {
    let crops = CropService::new(state.db).all_crops().await?;
    Ok(Json(CropListResponse {
        success: true,
        crops,
    }))
}

/// Add a crop to the catalog
pub async fn add_crop(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AddCropInput>,
) -> AppResult<(StatusCode, Json<CropResponse>)> {
    let crop = CropService::new(state.db).add_crop(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CropResponse {
            success: true,
            crop,
        }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualRecommendationRequest {
    pub soil_properties: Option<SoilPropertiesInput>,
    pub climate: Option<FarmlandClimate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualRecommendationResponse {
    pub success: bool,
    pub message: String,
    pub recommended_crops: Vec<RecommendedCrop>,
}

/// Rank the catalog against submitted soil and climate
pub async fn manual_recommendation(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ManualRecommendationRequest>,
) -> AppResult<Json<ManualRecommendationResponse>> {
    let snapshot = snapshot_from_input(body.soil_properties, body.climate).ok_or_else(|| {
        AppError::Validation("Provide soilProperties and climate conditions.".to_string())
    })??;

    let recommended_crops = state.recommendation_service().manual(&snapshot).await?;

    Ok(Json(ManualRecommendationResponse {
        success: true,
        message: "Crops recommended based on manual filtering.".to_string(),
        recommended_crops,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GptRecommendationRequest {
    pub farmland_id: Option<String>,
    pub soil_properties: Option<SoilPropertiesInput>,
    pub climate: Option<FarmlandClimate>,
}

/// The farmland the advice was given for
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AdvisedFarmland {
    Stored(Farmland),
    Submitted(FarmlandSnapshot),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GptRecommendationResponse {
    pub success: bool,
    pub message: String,
    pub farmland: AdvisedFarmland,
    pub recommended_crops: String,
}

/// Ask the AI advisor about a stored farmland or one-off conditions
pub async fn gpt_recommendation(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<GptRecommendationRequest>,
) -> AppResult<Json<GptRecommendationResponse>> {
    let farmland = match body.farmland_id.filter(|id| !id.is_empty()) {
        Some(id) => {
            let id = parse_id(&id, "Farmland")?;
            AdvisedFarmland::Stored(FarmlandService::new(state.db.clone()).get_farmland(id).await?)
        }
        None => {
            let snapshot = snapshot_from_input(body.soil_properties, body.climate).ok_or_else(|| {
                AppError::Validation("Provide a farmlandId or full farmland details.".to_string())
            })??;
            AdvisedFarmland::Submitted(snapshot)
        }
    };

    let snapshot = match &farmland {
        AdvisedFarmland::Stored(farmland) => farmland.snapshot(),
        AdvisedFarmland::Submitted(snapshot) => snapshot.clone(),
    };

    let recommended_crops = state.recommendation_service().advise(&snapshot).await?;

    Ok(Json(GptRecommendationResponse {
        success: true,
        message: "Farmland details retrieved successfully.".to_string(),
        farmland,
        recommended_crops,
    }))
}
