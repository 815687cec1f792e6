//! Fixed-window limiter for failed login attempts
//!
//! A counter per identity lives in the cache store under
//! `login_attempts:<identity>`. The window starts at the first failure and is
//! not extended by later ones; a successful login deletes the counter.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use shared::cache_key::login_attempts_key;

use crate::cache::CacheStore;
use crate::config::RateLimitConfig;
use crate::error::{AppError, AppResult};

/// How a credential check ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failure,
}

#[derive(Clone)]
pub struct LoginRateLimiter {
    store: Arc<dyn CacheStore>,
    max_attempts: i64,
    window: Duration,
}

impl LoginRateLimiter {
    pub fn new(store: Arc<dyn CacheStore>, config: &RateLimitConfig) -> Self {
        Self {
            store,
            max_attempts: config.max_attempts,
            window: config.window(),
        }
    }

    /// Failed attempts recorded in the current window
    pub async fn attempts(&self, identity: &str) -> AppResult<i64> {
        let raw = self.store.get(&login_attempts_key(identity)).await?;
        Ok(raw
            .as_deref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0))
    }

    /// Reject once the identity has used up its attempts. Does not count.
    pub async fn check(&self, identity: &str) -> AppResult<()> {
        let attempts = self.attempts(identity).await?;
        if attempts >= self.max_attempts {
            tracing::warn!(identity, attempts, "login blocked by rate limiter");
            return Err(AppError::TooManyAttempts);
        }
        Ok(())
    }

    pub async fn record(&self, identity: &str, outcome: AttemptOutcome) -> AppResult<()> {
        let key = login_attempts_key(identity);
        match outcome {
            AttemptOutcome::Success => self.store.delete(&key).await,
            AttemptOutcome::Failure => {
                // The window opens with the counter, later failures keep it
                let count = self.store.increment(&key, self.window).await?;
                tracing::debug!(identity, count, "recorded failed login");
                Ok(())
            }
        }
    }

    /// Run a credential check under the limiter.
    ///
    /// `Unauthorized` from the check counts as a failure, `Ok` resets the
    /// counter, and any other error leaves the counter untouched. A store
    /// failure while recording is logged; the caller still gets the outcome
    /// of the credential check.
    pub async fn attempt<T, F, Fut>(&self, identity: &str, credential_check: F) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        self.check(identity).await?;

        match credential_check().await {
            Ok(value) => {
                self.record_logged(identity, AttemptOutcome::Success).await;
                Ok(value)
            }
            Err(err @ AppError::Unauthorized(_)) => {
                self.record_logged(identity, AttemptOutcome::Failure).await;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    async fn record_logged(&self, identity: &str, outcome: AttemptOutcome) {
        if let Err(e) = self.record(identity, outcome).await {
            tracing::warn!(identity, ?outcome, error = %e, "failed to record login attempt");
        }
    }
}
