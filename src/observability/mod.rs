//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems emit `tracing` events:
//!     → logging.rs (subscriber: env filter + pretty or JSON formatter)
//!     → stdout
//!
//! Per request:
//!     → tower_http TraceLayer span (method, uri, status, latency)
//!     → x-request-id header set and echoed back
//! ```

pub mod logging;

pub use logging::init_logging;
