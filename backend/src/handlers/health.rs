//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::CacheBackend;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub cache: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check database connectivity
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    let cache_status = match (state.config.cache.backend, state.cache.get("health:probe").await) {
        (CacheBackend::Memory, _) => "memory",
        (CacheBackend::Redis, Ok(_)) => "connected",
        (CacheBackend::Redis, Err(_)) => "disconnected",
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status.to_string(),
        cache: cache_status.to_string(),
    })
}
