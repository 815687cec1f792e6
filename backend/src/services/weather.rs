//! Cached weather lookups by city

use shared::cache_key::weather_key;
use shared::WeatherResponse;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{get_with_cache, CacheStore};
use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};
use crate::external::WeatherProvider;

/// Weather service
#[derive(Clone)]
pub struct WeatherService {
    store: Arc<dyn CacheStore>,
    provider: Arc<dyn WeatherProvider>,
    ttl: Duration,
}

impl WeatherService {
    pub fn new(
        store: Arc<dyn CacheStore>,
        provider: Arc<dyn WeatherProvider>,
        config: &WeatherConfig,
    ) -> Self {
        Self {
            store,
            provider,
            ttl: config.cache_ttl(),
        }
    }

    /// Current weather for a city.
    ///
    /// The city is used as given, so "Pune" and "pune" are cached separately.
    pub async fn current(&self, city: &str) -> AppResult<WeatherResponse> {
        if city.trim().is_empty() {
            return Err(AppError::Validation("City name must be provided".to_string()));
        }

        get_with_cache(self.store.as_ref(), &weather_key(city), self.ttl, || {
            self.provider.fetch(city)
        })
        .await
    }
}
