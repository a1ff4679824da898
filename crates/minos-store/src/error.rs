//! Error types for the cache backend.

use thiserror::Error;

/// Errors raised by a raw cache backend operation.
#[derive(Debug, Error)]
pub enum BackendError {
    /// A Redis-compatible operation failed.
    #[error("cache backend error: {0}")]
    Redis(#[from] fred::error::Error),

    /// The backend URL could not be parsed.
    #[error("invalid cache URL: {0}")]
    Config(String),
}
