//! Error types for the core.
//!
//! Validation and routing failures are not errors here — the dispatcher
//! reports them as `(payload, status)` pairs. The only `Err` path out of
//! the core is a store failure inside a handler, which the transport
//! maps to an internal-error response.

use thiserror::Error;

/// Errors raised by the cache store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A read-through `get` failed after the client's retries.
    #[error("cache read failed for key '{key}': {reason}")]
    Read {
        /// The key that could not be read.
        key: String,
        /// Backend-supplied failure detail.
        reason: String,
    },

    /// A stored value could not be decoded as JSON.
    #[error("stored value is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    /// Creates a read error for `key`.
    #[must_use]
    pub fn read(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Read {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
