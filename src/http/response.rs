//! JSON response payloads.
//!
//! Every response the server produces, success or failure, is one of the
//! bodies below serialized with `Content-Type: application/json`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub const WELCOME_MESSAGE: &str = "Welcome to the test server!";
pub const HEALTH_OK: &str = "OK";

pub const NOT_FOUND: &str = "Not found";
pub const INVALID_JSON: &str = "Invalid JSON";
pub const PAYLOAD_TOO_LARGE: &str = "Payload Too Large";
pub const REQUEST_TIMEOUT: &str = "Request Timeout";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
}

/// Error envelope shared by every failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,

    /// Only present in development mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Build a JSON error response with the given status and message.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}
