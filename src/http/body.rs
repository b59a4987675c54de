//! JSON body verification.
//!
//! Runs in front of the route table. Requests that declare a JSON body have
//! it buffered and parsed before any handler executes:
//! - unparseable, or not an object/array at the top level → 400 `Invalid JSON`
//! - larger than the configured limit → 413 `Payload Too Large`
//! - otherwise the bytes are re-attached and the parsed value is stored in
//!   the request extensions as [`JsonBody`]
//!
//! These responses are returned directly and are never seen by the error
//! stage.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::http::response::{error_response, INVALID_JSON, PAYLOAD_TOO_LARGE};
use crate::http::server::AppState;

/// Parsed JSON request body, available to handlers as an `Extension`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

/// Whether the request declares a JSON payload.
pub fn is_json_content(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Strict parse: only objects and arrays are accepted at the top level.
fn parse_strict(bytes: &[u8]) -> Option<Value> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

/// Body-verification middleware.
pub async fn verify_json_body(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !is_json_content(request.headers()) {
        return next.run(request).await;
    }

    let limit = state.body_limit();
    if declared_length(request.headers()).is_some_and(|len| len > limit) {
        return error_response(StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE);
    }

    let (mut parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(path = %parts.uri.path(), error = %e, "Failed to read request body");
            return error_response(StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE);
        }
    };

    if !bytes.is_empty() {
        match parse_strict(&bytes) {
            Some(value) => {
                parts.extensions.insert(JsonBody(value));
            }
            None => {
                tracing::debug!(path = %parts.uri.path(), "Rejected malformed JSON body");
                return error_response(StatusCode::BAD_REQUEST, INVALID_JSON);
            }
        }
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
