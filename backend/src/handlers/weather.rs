//! Weather handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::WeatherResponse;

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

/// Current weather for a city
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> AppResult<Json<WeatherResponse>> {
    let city = query
        .city
        .ok_or_else(|| AppError::Validation("City name must be provided".to_string()))?;

    let weather = state.weather_service().current(&city).await?;
    Ok(Json(weather))
}
