//! Route table handlers.

use axum::{
    http::{HeaderMap, StatusCode},
    response::Response,
    Json,
};

use crate::http::error::{status_override, ForwardedError};
use crate::http::response::{error_response, HealthBody, MessageBody, HEALTH_OK, NOT_FOUND, WELCOME_MESSAGE};

/// Header that switches `/error-test` to a 404 default.
pub const X_ERROR: &str = "x-error";

const TEST_ERROR: &str = "Test error";

/// `GET /`
pub async fn root() -> Json<MessageBody> {
    Json(MessageBody {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// `GET /health`
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: HEALTH_OK.to_string(),
    })
}

/// `GET /chain-error`: always forwards an error, 500 unless overridden.
pub async fn chain_error(headers: HeaderMap) -> Result<(), ForwardedError> {
    let status = status_override(&headers).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Err(ForwardedError::new(status, TEST_ERROR))
}

/// `GET /error-test`: 404 when `x-error` is present (overridable), else 500.
pub async fn error_test(headers: HeaderMap) -> Result<(), ForwardedError> {
    let status = if headers.contains_key(X_ERROR) {
        status_override(&headers).unwrap_or(StatusCode::NOT_FOUND)
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Err(ForwardedError::new(status, TEST_ERROR))
}

/// Catch-all for unmatched paths and methods.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, NOT_FOUND)
}
