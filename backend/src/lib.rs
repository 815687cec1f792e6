//! FarmLink Platform - Backend
//!
//! Farmland records, crop recommendation, weather, irrigation reminders and a
//! discussion board for farmers.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod cache;
pub mod config;
pub mod error;
pub mod external;
pub mod extract;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;

use cache::CacheStore;
use external::{CropAdvisor, SmsSender, WeatherProvider};
use services::{
    AuthService, CropRecommendationService, CropService, LoginRateLimiter, WeatherService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub cache: Arc<dyn CacheStore>,
    pub weather: Arc<dyn WeatherProvider>,
    pub advisor: Arc<dyn CropAdvisor>,
    pub sms: Arc<dyn SmsSender>,
}

impl AppState {
    pub fn rate_limiter(&self) -> LoginRateLimiter {
        LoginRateLimiter::new(self.cache.clone(), &self.config.rate_limit)
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.db.clone(), &self.config, self.rate_limiter())
    }

    pub fn weather_service(&self) -> WeatherService {
        WeatherService::new(self.cache.clone(), self.weather.clone(), &self.config.weather)
    }

    pub fn recommendation_service(&self) -> CropRecommendationService {
        CropRecommendationService::new(
            Arc::new(CropService::new(self.db.clone())),
            self.cache.clone(),
            self.advisor.clone(),
            &self.config.openai,
        )
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .merge(routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "FarmLink Platform API v1.0"
}
