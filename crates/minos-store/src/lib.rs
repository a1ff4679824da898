//! # Minos Store
//!
//! The cache collaborator for the Minos scoring gateway: a retrying
//! key-value client over a Redis-compatible backend, implementing the
//! [`minos_core::Store`] seam.
//!
//! The raw [`Backend`] is a one-shot get/set surface; [`CacheStore`]
//! layers the retry policy on top, so the policy is unit-testable
//! without a live server.
//!
//! # Example
//!
//! ```rust,ignore
//! use minos_store::{CacheStore, RedisBackend};
//!
//! let backend = RedisBackend::connect("redis://127.0.0.1:6379").await?;
//! let store = CacheStore::new(backend);
//! ```

#![doc(html_root_url = "https://docs.rs/minos-store/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod backend;
mod client;
mod error;

pub use backend::{Backend, RedisBackend};
pub use client::{CacheStore, RETRY_COUNT};
pub use error::BackendError;
