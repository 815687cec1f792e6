//! In-process cache store
//!
//! Used by tests and single-instance deployments. Expiry follows the tokio
//! clock, so paused-time tests can step past a TTL without sleeping.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

use super::CacheStore;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn new(value: Vec<u8>, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock().values().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // A panic while holding the lock cannot leave a half-written entry
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Drop `key` if it has expired and return the live entry, if any
    fn live_entry<'a>(map: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a mut Entry> {
        let now = Instant::now();
        if map.get(key).is_some_and(|e| !e.is_live(now)) {
            map.remove(key);
        }
        map.get_mut(key)
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let mut map = self.lock();
        Ok(Self::live_entry(&mut map, key).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> AppResult<()> {
        self.lock().insert(key.to_string(), Entry::new(value, ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.lock().remove(key);
        Ok(())
    }

    async fn increment(&self, key: &str, ttl: Duration) -> AppResult<i64> {
        let mut map = self.lock();
        let next = match Self::live_entry(&mut map, key) {
            Some(entry) => {
                let current: i64 = std::str::from_utf8(&entry.value)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| {
                        AppError::Cache(format!("value at {} is not an integer", key))
                    })?;
                let next = current + 1;
                entry.value = next.to_string().into_bytes();
                next
            }
            None => {
                map.insert(key.to_string(), Entry::new(b"1".to_vec(), ttl));
                1
            }
        };
        Ok(next)
    }
}
