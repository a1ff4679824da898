//! The retrying cache client.
//!
//! [`CacheStore`] wraps a raw [`Backend`] with the gateway's retry
//! policy and implements the [`Store`] seam consumed by the business
//! computations. A failed or missing read is retried up to
//! [`RETRY_COUNT`] additional times; retries are independent per call.

use crate::backend::Backend;
use async_trait::async_trait;
use minos_core::{Store, StoreError};
use std::time::Duration;

/// Additional read/write attempts after a miss or failure.
pub const RETRY_COUNT: usize = 4;

/// A retrying key-value client over a raw backend.
pub struct CacheStore<B> {
    backend: B,
    retry_count: usize,
}

impl<B: Backend> CacheStore<B> {
    /// Wraps a backend with the default retry policy.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            retry_count: RETRY_COUNT,
        }
    }

    /// Overrides the number of additional attempts.
    #[must_use]
    pub fn with_retry_count(mut self, retry_count: usize) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Reads `key`, retrying on miss or backend failure.
    async fn read_with_retries(&self, key: &str) -> Option<String> {
        for attempt in 0..=self.retry_count {
            match self.backend.read(key).await {
                Ok(Some(value)) => return Some(value),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(key = %key, attempt, error = %error, "cache read failed");
                }
            }
        }
        None
    }
}

#[async_trait]
impl<B: Backend> Store for CacheStore<B> {
    async fn get(&self, key: &str) -> Result<String, StoreError> {
        self.read_with_retries(key)
            .await
            .ok_or_else(|| StoreError::read(key, "no value after retries"))
    }

    async fn cache_get(&self, key: &str) -> Option<String> {
        self.read_with_retries(key).await
    }

    async fn cache_set(&self, key: &str, value: &str, ttl: Duration) -> bool {
        for attempt in 0..=self.retry_count {
            match self.backend.write(key, value, Some(ttl)).await {
                Ok(()) => return true,
                Err(error) => {
                    tracing::warn!(key = %key, attempt, error = %error, "cache write failed");
                }
            }
        }
        false
    }
}
