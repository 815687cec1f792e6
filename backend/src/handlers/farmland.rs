//! Farmland handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use shared::Farmland;

use crate::error::AppResult;
use crate::extract::{parse_id, ApiJson};
use crate::services::farmland::{AddFarmlandInput, FarmlandService};
use crate::AppState;

#[derive(Serialize)]
pub struct FarmlandResponse {
    pub success: bool,
    pub message: String,
    pub farmland: Farmland,
}

/// Add a farmland record
pub async fn add_farmland(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AddFarmlandInput>,
) -> AppResult<(StatusCode, Json<FarmlandResponse>)> {
    let farmland = input.validate()?;
    let farmland = FarmlandService::new(state.db).add_farmland(farmland).await?;

    Ok((
        StatusCode::CREATED,
        Json(FarmlandResponse {
            success: true,
            message: "Farmland data added successfully.".to_string(),
            farmland,
        }),
    ))
}

/// Get a farmland by ID
pub async fn get_farmland(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FarmlandResponse>> {
    let id = parse_id(&id, "Farmland")?;
    let farmland = FarmlandService::new(state.db).get_farmland(id).await?;

    Ok(Json(FarmlandResponse {
        success: true,
        message: "Farmland retrieved successfully.".to_string(),
        farmland,
    }))
}
