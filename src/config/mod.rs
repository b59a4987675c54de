//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! ServerConfig::default()
//!     → loader.rs (optional TOML file)
//!     → loader.rs (PORT / NODE_ENV / LOG_* overlay)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → cloned into AppState and the lifecycle controller
//! ```
//!
//! # Design Decisions
//! - Every field has a default so the server runs with no config file at all
//! - An unset port is a valid configuration: it means "do not start"
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{Environment, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, ServerConfig};
