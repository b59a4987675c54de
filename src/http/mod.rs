//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (lifecycle::controller)
//!     → server.rs (trace, request ID, timeout layers)
//!     → body.rs (JSON body verification; 400/413 short-circuit)
//!     → error.rs (error stage wrapping the route table)
//!     → handlers.rs (route table or 404 catch-all)
//!     → response.rs (JSON payloads)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Handlers forward failures as `ForwardedError` values; only the error
//!   stage decides how they are rendered
//! - Body errors are answered directly and never reach the error stage
//! - Unknown methods on known paths share the 404 catch-all

pub mod body;
pub mod error;
pub mod handlers;
pub mod response;
pub mod server;

pub use body::JsonBody;
pub use error::ForwardedError;
pub use server::{build_router, AppState};
