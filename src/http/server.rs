//! HTTP application setup.
//!
//! # Responsibilities
//! - Register the route table and the 404 catch-all
//! - Wire up middleware (tracing, request ID, timeout, body verification,
//!   error stage)
//!
//! Binding and serving is the lifecycle controller's job; this module only
//! produces the `Router`.

use axum::{
    http::{header, StatusCode},
    middleware,
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::body::verify_json_body;
use crate::http::error::error_stage;
use crate::http::handlers;
use crate::http::response::{error_response, REQUEST_TIMEOUT};

/// Application state injected into middleware.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn expose_stack_traces(&self) -> bool {
        self.config.expose_stack_traces()
    }

    pub fn body_limit(&self) -> usize {
        self.config.limits.body_limit_bytes
    }
}

/// Give the timeout layer's empty 408 the JSON error envelope.
///
/// Responses that already carry a content type (a forwarded 408, for
/// instance) are left alone.
pub async fn render_timeout(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE)
    {
        return error_response(StatusCode::REQUEST_TIMEOUT, REQUEST_TIMEOUT);
    }
    response
}

/// Build the application router with all middleware layers.
///
/// Layers run outermost first: trace, request ID, timeout (rendered as
/// JSON), body verification, error stage, then the routes. The error stage therefore
/// sits after every route and before the catch-all response reaches the
/// client, while body failures short-circuit ahead of it.
#[allow(deprecated)]
pub fn build_router(config: ServerConfig) -> Router {
    let timeout = Duration::from_secs(config.limits.request_timeout_secs);
    let state = AppState::new(config);

    Router::new()
        .route("/", get(handlers::root).fallback(handlers::not_found))
        .route("/health", get(handlers::health).fallback(handlers::not_found))
        .route("/chain-error", get(handlers::chain_error).fallback(handlers::not_found))
        .route("/error-test", get(handlers::error_test).fallback(handlers::not_found))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), error_stage))
        .layer(middleware::from_fn_with_state(state.clone(), verify_json_body))
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::map_response(render_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
