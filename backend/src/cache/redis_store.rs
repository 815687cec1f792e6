//! Redis-backed cache store
//!
//! Shared by every server instance, so login counters hold across a
//! horizontally scaled deployment.

use async_trait::async_trait;
use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    AsyncCommands, Client,
};
use std::time::Duration;

use super::CacheStore;
use crate::error::{AppError, AppResult};

/// Open a managed connection that reconnects on its own
pub async fn init_redis(redis_url: &str) -> AppResult<ConnectionManager> {
    let config = ConnectionManagerConfig::new().set_number_of_retries(1);

    let client = Client::open(redis_url).map_err(cache_error)?;
    client
        .get_connection_manager_with_config(config)
        .await
        .map_err(cache_error)
}

#[derive(Clone)]
pub struct RedisCacheStore {
    connection: ConnectionManager,
}

impl RedisCacheStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

fn cache_error(e: redis::RedisError) -> AppError {
    AppError::Cache(e.to_string())
}

// Redis rejects a zero expiry
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let mut conn = self.connection.clone();
        conn.get(key).await.map_err(cache_error)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> AppResult<()> {
        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds(ttl))
            .await
            .map_err(cache_error)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(key).await.map_err(cache_error)
    }

    async fn increment(&self, key: &str, ttl: Duration) -> AppResult<i64> {
        let mut conn = self.connection.clone();
        // EXPIRE ... NX only sets a TTL on a key that has none
        let (count,): (i64,) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .cmd("EXPIRE")
            .arg(key)
            .arg(ttl_seconds(ttl))
            .arg("NX")
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(count)
    }
}
