//! Key-value cache with expiry
//!
//! One `CacheStore` backs both the cached lookups (weather, crop advice) and
//! the login attempt counters. Values are opaque bytes; `get_with_cache`
//! layers JSON serialization on top.

mod memory;
mod redis_store;

pub use memory::MemoryCacheStore;
pub use redis_store::{init_redis, RedisCacheStore};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::error::AppResult;

/// Storage backend for cached values and counters.
///
/// Implementations must be safe to share between request handlers and must
/// drop entries once their TTL has elapsed.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a live entry
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>>;

    /// Store a value, replacing any previous entry and its TTL
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> AppResult<()>;

    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Atomically add one to an integer counter and return the new value.
    ///
    /// A missing key counts from zero and expires after `ttl`. An existing
    /// key keeps the expiry it already has.
    async fn increment(&self, key: &str, ttl: Duration) -> AppResult<i64>;
}

/// Return the cached value for `key`, or run `producer` and cache its result.
///
/// A producer error is returned as is and nothing is written. Failures of the
/// store itself are logged and treated as a miss or a skipped write, so an
/// unreachable cache only costs a slower request.
pub async fn get_with_cache<T, F, Fut>(
    store: &dyn CacheStore,
    key: &str,
    ttl: Duration,
    producer: F,
) -> AppResult<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    match store.get(key).await {
        Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => {
                tracing::debug!(key, "cache hit");
                return Ok(value);
            }
            Err(e) => tracing::warn!(key, error = %e, "discarding unreadable cache entry"),
        },
        Ok(None) => tracing::debug!(key, "cache miss"),
        Err(e) => tracing::warn!(key, error = %e, "cache read failed, treating as miss"),
    }

    let value = producer().await?;

    match serde_json::to_vec(&value) {
        Ok(bytes) => {
            if let Err(e) = store.set(key, bytes, ttl).await {
                tracing::warn!(key, error = %e, "cache write failed");
            }
        }
        Err(e) => tracing::warn!(key, error = %e, "could not serialize value for cache"),
    }

    Ok(value)
}
