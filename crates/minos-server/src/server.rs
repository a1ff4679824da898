//! HTTP server implementation.
//!
//! The transport for the scoring gateway, built on Hyper and Tokio:
//!
//! - TCP listener bound to the configured address
//! - one task per connection, tracked for graceful drain
//! - `POST /method` framed through the dispatch core
//! - `GET /health` liveness probe
//!
//! The transport owns the boundary error mapping: an unreadable or
//! malformed body answers 400 before the core runs, an unknown path
//! 404, and a store failure surfacing from dispatch 500. Everything
//! else is the core's `(payload, status)` pair framed as the wire
//! envelope.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::Value;
use tokio::net::TcpListener;

use minos_core::{method_handler, DispatchContext, Store};

use crate::config::ServerConfig;
use crate::health::HealthCheck;
use crate::response::envelope;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Type alias for the HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Header carrying the caller-assigned request id.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// The gateway HTTP server.
///
/// # Example
///
/// ```rust,ignore
/// use minos_server::{Server, ServerConfig};
///
/// let server = Server::new(ServerConfig::default(), store);
/// server.run().await?;
/// ```
pub struct Server {
    /// Server configuration
    config: ServerConfig,

    /// The cache store handed to dispatch
    store: Arc<dyn Store>,

    /// Health check handler
    health: HealthCheck,
}

impl Server {
    /// Creates a server over the given store.
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn Store>) -> Self {
        Self {
            config,
            store,
            health: HealthCheck::new("minos", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Returns a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns a reference to the health check handler.
    #[must_use]
    pub fn health(&self) -> &HealthCheck {
        &self.health
    }

    /// Runs the server until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot bind to the configured
    /// address or an I/O error occurs while accepting.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Runs the server with a custom shutdown signal.
    ///
    /// Useful for tests and programmatic shutdown.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.socket_addr().map_err(|e| {
            ServerError::Bind(format!("invalid address '{}': {}", self.config.http_addr(), e))
        })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("failed to bind to {addr}: {e}")))?;

        tracing::info!("Server listening on {}", addr);

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        // Accept connections until shutdown
        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            let token = tracker.acquire();
                            let shutdown_clone = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = server.handle_connection(stream, remote_addr, shutdown_clone).await {
                                    tracing::error!("Connection error from {}: {}", remote_addr, e);
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!("Failed to accept connection: {}", e);
                        }
                    }
                }

                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, stopping server");
                    break;
                }
            }
        }

        // Wait for in-flight connections with timeout
        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            "Waiting up to {:?} for {} connections to close",
            shutdown_timeout,
            tracker.active_connections()
        );

        tokio::select! {
            _ = tracker.wait_for_drain() => {
                tracing::info!("All connections closed");
            }
            _ = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    "Shutdown timeout reached, {} connections still active",
                    tracker.active_connections()
                );
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Handles a single connection.
    async fn handle_connection(
        self: &Arc<Self>,
        stream: tokio::net::TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { server.handle_request(req).await }
        });

        let conn = http1::Builder::new().serve_connection(io, service);

        tokio::select! {
            result = conn => {
                result
            }
            _ = shutdown.recv() => {
                tracing::debug!("Connection from {} closed due to shutdown", remote_addr);
                Ok(())
            }
        }
    }

    /// Handles a single HTTP request.
    async fn handle_request(
        self: &Arc<Self>,
        req: Request<Incoming>,
    ) -> Result<HttpResponse, Infallible> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let headers = req.headers().clone();

        // Collect the request body with a timeout
        let body = match tokio::time::timeout(
            self.config.request_timeout(),
            Self::collect_body(req),
        )
        .await
        {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                tracing::error!("Failed to collect request body: {}", e);
                return Ok(Self::framed(Value::Null, StatusCode::BAD_REQUEST));
            }
            Err(_) => {
                tracing::warn!("Request body collection timed out");
                return Ok(Self::framed(Value::Null, StatusCode::BAD_REQUEST));
            }
        };

        Ok(self.route(&method, &path, &headers, body).await)
    }

    /// Collects the request body into bytes.
    async fn collect_body(req: Request<Incoming>) -> Result<Bytes, hyper::Error> {
        let body = req.into_body();
        let collected = body.collect().await?;
        Ok(collected.to_bytes())
    }

    /// Routes a collected request to the matching handler.
    async fn route(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> HttpResponse {
        match (method.as_str(), path) {
            ("GET", "/health") => self.handle_health(),
            ("POST", "/method") => self.handle_method(headers, body).await,
            _ => Self::framed(Value::Null, StatusCode::NOT_FOUND),
        }
    }

    /// Handles the `/health` endpoint.
    fn handle_health(&self) -> HttpResponse {
        let status = self.health.status();
        let body = serde_json::to_string(&status)
            .unwrap_or_else(|_| r#"{"status":"healthy"}"#.to_string());

        Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(body)))
            .unwrap_or_else(|_| Response::new(Full::new(Bytes::from(r#"{"status":"healthy"}"#))))
    }

    /// Handles the `/method` endpoint: parse, dispatch, frame.
    async fn handle_method(&self, headers: &HeaderMap, body: Bytes) -> HttpResponse {
        let request_id = request_id(headers);

        let parsed: Value = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(error) => {
                tracing::warn!(request_id = %request_id, error = %error, "malformed request body");
                return Self::framed(Value::Null, StatusCode::BAD_REQUEST);
            }
        };

        tracing::info!(request_id = %request_id, http.path = "/method", "Request started");

        let mut ctx = DispatchContext::new(request_id.clone());
        let dispatched = tokio::time::timeout(
            self.config.request_timeout(),
            method_handler(&parsed, &mut ctx, self.store.as_ref()),
        )
        .await;

        let (payload, status) = match dispatched {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(error)) => {
                tracing::error!(request_id = %request_id, error = %error, "dispatch failed");
                (Value::Null, StatusCode::INTERNAL_SERVER_ERROR)
            }
            Err(_) => {
                tracing::error!(request_id = %request_id, "dispatch timed out");
                (Value::Null, StatusCode::INTERNAL_SERVER_ERROR)
            }
        };

        tracing::info!(
            request_id = %request_id,
            http.status_code = status.as_u16(),
            has = ?ctx.has(),
            nclients = ctx.nclients(),
            "Request completed"
        );
        Self::framed(payload, status)
    }

    /// Builds the HTTP response carrying the wire envelope.
    fn framed(payload: Value, status: StatusCode) -> HttpResponse {
        let body = envelope(payload, status);
        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
    }
}

/// Extracts the caller's request id, or assigns a fresh one.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::now_v7().simple().to_string())
}

/// Server error types.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the configured address.
    #[error("Bind error: {0}")]
    Bind(String),

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
