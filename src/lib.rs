//! Minimal JSON test server.
//!
//! A fixed route table (`/`, `/health`, `/chain-error`, `/error-test`)
//! behind JSON body verification, a single error stage and a 404
//! catch-all, plus a lifecycle controller that binds, reports and closes
//! listeners.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use http::build_router;
pub use lifecycle::{LifecycleController, ServerHandle};
