//! Raw cache backends.
//!
//! A [`Backend`] is a single-attempt get/set surface; the retry policy
//! lives one layer up in [`CacheStore`](crate::CacheStore). Splitting
//! the two keeps the retry logic testable against an in-memory fake
//! while production runs on a Redis-compatible server.

use crate::error::BackendError;
use async_trait::async_trait;
use fred::prelude::*;
use std::time::Duration;

/// One-shot key-value operations against a cache server.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Reads `key`, returning `None` when it does not exist.
    async fn read(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Writes `key`, with an optional time-to-live.
    async fn write(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), BackendError>;
}

/// A [`Backend`] over a Redis-compatible server.
#[derive(Clone)]
pub struct RedisBackend {
    client: Client,
}

impl RedisBackend {
    /// Connects to the server at `url` (`redis://host:port`).
    pub async fn connect(url: &str) -> Result<Self, BackendError> {
        let config = Config::from_url(url)
            .map_err(|e| BackendError::Config(format!("invalid cache URL '{url}': {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!(url = %url, "connected to cache backend");
        Ok(Self { client })
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn read(&self, key: &str) -> Result<Option<String>, BackendError> {
        let value: Option<String> = self.client.get(key).await?;
        Ok(value)
    }

    async fn write(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), BackendError> {
        let expiration =
            ttl.map(|ttl| Expiration::EX(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)));
        let _: () = self.client.set(key, value, expiration, None, false).await?;
        Ok(())
    }
}
