//! # Minos Core
//!
//! Core validation, authentication and dispatch for the Minos scoring
//! gateway.
//!
//! This crate provides the request-processing pipeline consumed by the
//! transport:
//!
//! - [`Field`] / [`FieldKind`] - self-validating fields with
//!   required/nullable/clean semantics
//! - [`FieldSet`] - ordered schemas with aggregate error reporting
//! - [`MethodRequest`], [`OnlineScoreRequest`], [`ClientsInterestsRequest`] -
//!   the envelope and per-method argument schemas
//! - [`check_auth`] - SHA-512 token authentication
//! - [`method_handler`] - the dispatch state machine
//! - [`Store`] - the cache collaborator seam
//!
//! The core is stateless across requests: each request owns a fresh
//! field graph and a fresh [`DispatchContext`].

#![doc(html_root_url = "https://docs.rs/minos-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod auth;
mod context;
mod dispatch;
mod error;
mod field;
mod request;
mod schema;
mod scoring;
mod store;

pub use auth::{admin_token, check_auth, token_digest, user_token, ADMIN_LOGIN, ADMIN_SALT, SALT};
pub use context::DispatchContext;
pub use dispatch::{
    method_handler, DispatchResult, METHOD_CLIENTS_INTERESTS, METHOD_ONLINE_SCORE,
};
pub use error::StoreError;
pub use field::{Field, FieldKind};
pub use request::{ClientsInterestsRequest, MethodRequest, OnlineScoreRequest, CONTACT_PAIRS};
pub use schema::FieldSet;
pub use scoring::{get_interests, get_score, ScoreQuery};
pub use store::Store;
