//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (controller.rs):
//!     resolve port → bind → spawn axum::serve → ServerHandle
//!         address in use  → "no server" (Ok(None)), warning logged
//!         other bind error → LifecycleError
//!
//! Shutdown (shutdown.rs):
//!     ServerHandle::close → broadcast → stop accepting → drain → closed
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → binary closes its handle
//! ```
//!
//! # States
//! ```text
//! Unbound → Listening   (bind succeeded)
//! Unbound → Unbound     (port in use, or no port configured)
//! Unbound → Failed      (unrecoverable bind error)
//! Listening → Closed    (close or reset)
//! ```

pub mod controller;
pub mod shutdown;
pub mod signals;

pub use controller::{listen, resolve_port, LifecycleController, LifecycleError, LifecycleState, ServerHandle};
pub use shutdown::Shutdown;
