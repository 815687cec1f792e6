//! Irrigation scheduling handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use shared::IrrigationSchedule;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::services::irrigation::CreateScheduleInput;
use crate::services::IrrigationService;
use crate::AppState;

#[derive(Serialize)]
pub struct ScheduleResponse {
    pub success: bool,
    pub schedule: IrrigationSchedule,
}

#[derive(Serialize)]
pub struct ScheduleListResponse {
    pub success: bool,
    pub schedules: Vec<IrrigationSchedule>,
}

/// Create an irrigation schedule
pub async fn create_schedule(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateScheduleInput>,
) -> AppResult<(StatusCode, Json<ScheduleResponse>)> {
    let request = input.validate()?;
    let schedule = IrrigationService::new(state.db.clone())
        .create_schedule(
            request,
            &state.weather_service(),
            &state.config.weather.default_city,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ScheduleResponse {
            success: true,
            schedule,
        }),
    ))
}

/// List all irrigation schedules
pub async fn get_schedules(State(state): State<AppState>) -> AppResult<Json<ScheduleListResponse>> {
    let schedules = IrrigationService::new(state.db).list_schedules().await?;
    Ok(Json(ScheduleListResponse {
        success: true,
        schedules,
    }))
}
