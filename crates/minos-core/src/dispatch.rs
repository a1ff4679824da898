//! Method dispatch: envelope validation, authentication and routing.
//!
//! [`method_handler`] is a linear state machine:
//!
//! ```text
//! ValidateEnvelope -> Authenticate -> ResolveMethod -> Invoke -> Respond
//! ```
//!
//! Every outcome is a `(payload, status)` pair — validation and routing
//! failures are results, not errors. No step retries; the only `Err`
//! path is a store failure inside a handler, which the transport maps
//! to an internal error.

use crate::auth::check_auth;
use crate::context::DispatchContext;
use crate::error::StoreError;
use crate::request::{ClientsInterestsRequest, MethodRequest, OnlineScoreRequest};
use crate::scoring::{get_interests, get_score};
use crate::store::Store;
use http::StatusCode;
use serde_json::{json, Map, Value};

/// Method name of the score computation.
pub const METHOD_ONLINE_SCORE: &str = "online_score";

/// Method name of the interests lookup.
pub const METHOD_CLIENTS_INTERESTS: &str = "clients_interests";

/// The fixed score returned to the privileged caller.
const ADMIN_SCORE: i64 = 42;

/// A dispatch outcome: the response payload and its status code.
pub type DispatchResult = Result<(Value, StatusCode), StoreError>;

/// Validates, authenticates and dispatches one request envelope.
///
/// `body` is the parsed JSON request body; a non-object body fails
/// envelope validation like an empty one. The context is exclusively
/// owned for the duration of the call and handed to at most one
/// handler.
pub async fn method_handler(
    body: &Value,
    ctx: &mut DispatchContext,
    store: &dyn Store,
) -> DispatchResult {
    let envelope = body.as_object().cloned().unwrap_or_default();
    let mut request = MethodRequest::new(&envelope);

    if !request.is_valid() {
        return Ok((
            Value::String(request.render_errors()),
            StatusCode::UNPROCESSABLE_ENTITY,
        ));
    }
    if !check_auth(&request) {
        tracing::debug!(request_id = %ctx.request_id(), "token mismatch");
        return Ok((Value::String("invalid token".into()), StatusCode::FORBIDDEN));
    }

    let arguments = request.arguments();
    match request.method() {
        Some(METHOD_ONLINE_SCORE) => {
            online_score(&arguments, request.is_admin(), ctx, store).await
        }
        Some(METHOD_CLIENTS_INTERESTS) => clients_interests(&arguments, ctx, store).await,
        _ => Ok((Value::String("method not found".into()), StatusCode::NOT_FOUND)),
    }
}

/// Handles `online_score`.
///
/// The admin caller short-circuits to a fixed score without validating
/// the arguments or touching the cache. `ctx.has` records the supplied
/// fields on every path.
async fn online_score(
    arguments: &Map<String, Value>,
    is_admin: bool,
    ctx: &mut DispatchContext,
    store: &dyn Store,
) -> DispatchResult {
    let mut request = OnlineScoreRequest::new(arguments);

    let outcome = if is_admin {
        (json!({ "score": ADMIN_SCORE }), StatusCode::OK)
    } else if request.is_valid() {
        let score = get_score(store, &request.score_query()).await;
        (json!({ "score": score }), StatusCode::OK)
    } else {
        (
            Value::String(request.render_errors()),
            StatusCode::UNPROCESSABLE_ENTITY,
        )
    };

    ctx.set_has(request.not_null_fields().to_vec());
    Ok(outcome)
}

/// Handles `clients_interests`.
///
/// Interests are looked up per client id in input order; `ctx.nclients`
/// records the id count, or stays 0 when validation failed before a
/// list existed.
async fn clients_interests(
    arguments: &Map<String, Value>,
    ctx: &mut DispatchContext,
    store: &dyn Store,
) -> DispatchResult {
    let mut request = ClientsInterestsRequest::new(arguments);

    if !request.is_valid() {
        ctx.set_nclients(0);
        return Ok((
            Value::String(request.render_errors()),
            StatusCode::UNPROCESSABLE_ENTITY,
        ));
    }

    let client_ids = request.client_ids();
    ctx.set_nclients(client_ids.len());

    let mut response = Map::new();
    for client_id in client_ids {
        let interests = get_interests(store, client_id).await?;
        response.insert(client_id.to_string(), interests);
    }
    Ok((Value::Object(response), StatusCode::OK))
}
