//! Crop recommendation service
//!
//! Two ways to pick crops for a farmland: ranking the catalog with the
//! scoring engine, or asking the AI advisor. Advisor answers are cached by
//! the soil and climate snapshot, so identical conditions are only sent once
//! per TTL.

use serde::Serialize;
use shared::cache_key::crop_advice_key;
use shared::{rank_crops, CropClimate, FarmlandSnapshot, PhRange, ScoredCrop, SoilType};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{get_with_cache, CacheStore};
use crate::config::OpenAiConfig;
use crate::error::{AppError, AppResult};
use crate::external::CropAdvisor;
use crate::services::CropCatalog;

/// One entry of a manual recommendation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedCrop {
    pub name: String,
    pub score: u32,
    pub ideal_soil_type: SoilType,
    #[serde(rename = "pHRange")]
    pub ph_range: PhRange,
    pub climate: CropClimate,
}

impl From<ScoredCrop> for RecommendedCrop {
    fn from(scored: ScoredCrop) -> Self {
        let crop = scored.crop;
        Self {
            name: crop.name,
            score: scored.score,
            ideal_soil_type: crop.ideal_soil_type,
            ph_range: crop.ideal_ph_range,
            climate: crop.climate,
        }
    }
}

#[derive(Clone)]
pub struct CropRecommendationService {
    catalog: Arc<dyn CropCatalog>,
    store: Arc<dyn CacheStore>,
    advisor: Arc<dyn CropAdvisor>,
    advice_ttl: Duration,
    pre_call_delay: Duration,
}

impl CropRecommendationService {
    pub fn new(
        catalog: Arc<dyn CropCatalog>,
        store: Arc<dyn CacheStore>,
        advisor: Arc<dyn CropAdvisor>,
        config: &OpenAiConfig,
    ) -> Self {
        Self {
            catalog,
            store,
            advisor,
            advice_ttl: config.cache_ttl(),
            pre_call_delay: config.pre_call_delay(),
        }
    }

    /// Override the pause taken before an uncached advisor call
    pub fn with_pre_call_delay(mut self, delay: Duration) -> Self {
        self.pre_call_delay = delay;
        self
    }

    /// Rank the whole catalog against the snapshot, best match first
    pub async fn manual(&self, snapshot: &FarmlandSnapshot) -> AppResult<Vec<RecommendedCrop>> {
        let catalog = self.catalog.all_crops().await?;
        let ranked = rank_crops(catalog, snapshot);

        tracing::debug!(
            crops = ranked.len(),
            top_score = ranked.first().map(|c| c.score),
            "ranked crop catalog"
        );

        Ok(ranked.into_iter().map(RecommendedCrop::from).collect())
    }

    /// Free-text advice for the snapshot, served from cache when possible
    pub async fn advise(&self, snapshot: &FarmlandSnapshot) -> AppResult<String> {
        let key = crop_advice_key(snapshot)
            .map_err(|e| AppError::Internal(format!("Failed to derive cache key: {}", e)))?;

        get_with_cache(self.store.as_ref(), &key, self.advice_ttl, || async move {
            // Throttle outbound calls; cache hits skip this
            if !self.pre_call_delay.is_zero() {
                tokio::time::sleep(self.pre_call_delay).await;
            }
            self.advisor.recommend(snapshot).await
        })
        .await
    }
}
