//! Forwarded errors and the error stage.
//!
//! Route handlers never render their own failures. They return a
//! `ForwardedError`, whose `IntoResponse` impl parks the error in the
//! response extensions. The `error_stage` middleware, layered directly
//! around the route table, picks it up and renders the JSON envelope,
//! attaching a stack trace only in development mode.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::sync::Arc;

use crate::http::response::{ErrorBody, INTERNAL_SERVER_ERROR};
use crate::http::server::AppState;

/// Header carrying a status override for the error test routes.
pub const X_ERROR_STATUS: &str = "x-error-status";

/// An error passed from a handler to the error stage.
pub struct ForwardedError {
    status: StatusCode,
    message: String,
    backtrace: Backtrace,
}

impl ForwardedError {
    /// Create a forwarded error. A backtrace is captured when enabled through
    /// `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// A 500 error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Render the stack trace exposed in development mode.
    pub fn stack(&self) -> String {
        match self.backtrace.status() {
            BacktraceStatus::Captured => format!("Error: {}\n{}", self.message, self.backtrace),
            _ => format!("Error: {}", self.message),
        }
    }

    fn envelope(&self, expose_stack: bool) -> Response {
        let mut body = ErrorBody::new(INTERNAL_SERVER_ERROR);
        if expose_stack {
            body = body.with_stack(self.stack());
        }
        (self.status, Json(body)).into_response()
    }
}

impl fmt::Debug for ForwardedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardedError")
            .field("status", &self.status)
            .field("message", &self.message)
            .finish()
    }
}

impl fmt::Display for ForwardedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for ForwardedError {}

impl IntoResponse for ForwardedError {
    fn into_response(self) -> Response {
        // Stack-free rendering in case no error stage is installed.
        let mut response = self.envelope(false);
        response.extensions_mut().insert(Arc::new(self));
        response
    }
}

/// Read a status override from `x-error-status`.
///
/// Only error statuses (400..=599) are honoured; anything else is ignored so
/// the caller's default applies.
pub fn status_override(headers: &HeaderMap) -> Option<StatusCode> {
    let raw = headers.get(X_ERROR_STATUS)?.to_str().ok()?;
    let code = raw.trim().parse::<u16>().ok()?;
    if !(400..=599).contains(&code) {
        return None;
    }
    StatusCode::from_u16(code).ok()
}

/// Error stage: renders any `ForwardedError` produced by the inner router.
pub async fn error_stage(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let Some(error) = response.extensions().get::<Arc<ForwardedError>>().cloned() else {
        return response;
    };

    tracing::error!(
        method = %method,
        path = %path,
        status = error.status().as_u16(),
        error = %error.message(),
        "Request failed"
    );
    error.envelope(state.expose_stack_traces())
}
