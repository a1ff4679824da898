//! # Minos Server
//!
//! HTTP transport for the Minos scoring gateway, built on Hyper and
//! Tokio.
//!
//! The transport reads a JSON envelope from `POST /method`, hands it to
//! the dispatch core, and frames the resulting `(payload, status)` pair
//! as the wire envelope. A `GET /health` liveness probe and graceful
//! shutdown come along for deployment.

#![doc(html_root_url = "https://docs.rs/minos-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod health;
pub mod response;
mod server;
mod shutdown;

pub use config::{ServerConfig, ServerConfigBuilder, DEFAULT_PORT};
pub use health::{HealthCheck, HealthStatus};
pub use server::{HttpResponse, ResponseBody, Server, ServerError};
pub use shutdown::{ConnectionTracker, ConnectionToken, ShutdownSignal};

/// The gateway version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
