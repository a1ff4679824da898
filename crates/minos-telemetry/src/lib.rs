//! # Minos Telemetry
//!
//! Structured logging bootstrap for the Minos scoring gateway.
//!
//! Built on tracing / tracing-subscriber:
//!
//! - [`LogConfig`] - level, format and optional file target
//! - [`init_logging`] - installs the global subscriber
//! - [`logging::fields`] - shared log field names

#![doc(html_root_url = "https://docs.rs/minos-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
