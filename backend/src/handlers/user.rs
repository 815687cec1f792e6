//! User handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use shared::User;

use crate::error::AppResult;
use crate::extract::parse_id;
use crate::services::UserService;
use crate::AppState;

#[derive(Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

/// Get a user profile
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_id(&id, "User")?;
    let user = UserService::new(state.db).get_user(id).await?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}
