//! Wire envelope framing for dispatch outcomes.
//!
//! Every response body carries its status code alongside the payload:
//! error statuses frame as `{"error": <string>, "code": <status>}` with
//! a fixed default phrase when the dispatcher supplied no message, and
//! everything else frames as `{"response": <value>, "code": <status>}`.

use http::StatusCode;
use serde_json::{json, Value};

/// Returns the default error phrase for a wire-visible error status.
///
/// Statuses outside this table frame as successes.
#[must_use]
pub fn default_error_phrase(status: StatusCode) -> Option<&'static str> {
    match status.as_u16() {
        400 => Some("Bad Request"),
        403 => Some("Forbidden"),
        404 => Some("Not Found"),
        422 => Some("Invalid Request"),
        500 => Some("Internal Server Error"),
        _ => None,
    }
}

/// Frames a dispatch outcome as the wire envelope body.
#[must_use]
pub fn envelope(payload: Value, status: StatusCode) -> Value {
    match default_error_phrase(status) {
        Some(phrase) => json!({
            "error": error_message(payload, phrase),
            "code": status.as_u16(),
        }),
        None => json!({
            "response": payload,
            "code": status.as_u16(),
        }),
    }
}

/// Picks the error message: the dispatcher's non-empty string, or the
/// status's default phrase.
fn error_message(payload: Value, phrase: &'static str) -> Value {
    match payload {
        Value::String(message) if !message.is_empty() => Value::String(message),
        _ => Value::String(phrase.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let body = envelope(json!({"score": 3.0}), StatusCode::OK);
        assert_eq!(body, json!({"response": {"score": 3.0}, "code": 200}));
    }

    #[test]
    fn test_error_envelope_keeps_message() {
        let body = envelope(json!("invalid token"), StatusCode::FORBIDDEN);
        assert_eq!(body, json!({"error": "invalid token", "code": 403}));
    }

    #[test]
    fn test_error_envelope_defaults_empty_messages() {
        let cases = [
            (StatusCode::BAD_REQUEST, "Bad Request"),
            (StatusCode::FORBIDDEN, "Forbidden"),
            (StatusCode::NOT_FOUND, "Not Found"),
            (StatusCode::UNPROCESSABLE_ENTITY, "Invalid Request"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        ];
        for (status, phrase) in cases {
            let body = envelope(json!(""), status);
            assert_eq!(
                body,
                json!({"error": phrase, "code": status.as_u16()}),
                "default phrase for {status}"
            );
        }
    }

    #[test]
    fn test_error_envelope_defaults_non_string_payloads() {
        let body = envelope(json!({}), StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Bad Request", "code": 400}));
    }

    #[test]
    fn test_minimal_error_string_is_preserved() {
        // A validation pass that failed only the pair rule renders as ".".
        let body = envelope(json!("."), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({"error": ".", "code": 422}));
    }
}
