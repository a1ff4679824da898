//! The cache store seam consumed by the business computations.
//!
//! The core never talks to a backend directly; handlers receive a
//! `&dyn Store` and the concrete retrying client lives in its own crate.
//! Implementations must be safe for concurrent use by multiple in-flight
//! requests — retry logic is independent per call, with no cross-call
//! ordering guarantee.

use crate::error::StoreError;
use async_trait::async_trait;
use std::time::Duration;

/// A narrow key-value store interface.
///
/// `get` is a read-through that errors when the key cannot be read;
/// the `cache_*` pair is best-effort and never fails the request.
#[async_trait]
pub trait Store: Send + Sync {
    /// Reads `key`, erroring on miss or backend failure.
    async fn get(&self, key: &str) -> Result<String, StoreError>;

    /// Reads `key`, returning `None` on miss or failure.
    async fn cache_get(&self, key: &str) -> Option<String>;

    /// Writes `key` with a time-to-live, reporting success.
    async fn cache_set(&self, key: &str, value: &str, ttl: Duration) -> bool;
}
