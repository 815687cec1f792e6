//! Weather API client for fetching current conditions
//!
//! Integrates with the OpenWeatherMap current-weather endpoint by city name.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::WeatherResponse;
use std::time::Duration;

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "weather data";

/// Source of current weather for a city
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, city: &str) -> AppResult<WeatherResponse>;
}

/// OpenWeatherMap client
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    /// Create a new client with a request timeout
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, city: &str) -> AppResult<WeatherResponse> {
        let url = format!("{}/weather", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", &self.api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| AppError::upstream(SERVICE, format!("Request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(AppError::NotFound(format!("Weather for city '{}'", city)));
            }
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(AppError::upstream(
                    SERVICE,
                    format!("API returned {}: {}", status, body),
                ));
            }
        }

        let weather: WeatherResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream(SERVICE, format!("Failed to parse response: {}", e)))?;

        tracing::debug!(city, "fetched weather from provider");
        Ok(weather)
    }
}
