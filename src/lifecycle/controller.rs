//! Listener lifecycle: bind, serve, close.
//!
//! [`listen`] is the independent path: every call binds its own port and
//! returns its own [`ServerHandle`]. [`LifecycleController`] wraps it with a
//! reset-before-start guard so at most one handle is live per controller.

use axum::Router;
use std::io;
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::{Environment, ServerConfig};
use crate::lifecycle::shutdown::Shutdown;

/// Errors that can occur while starting or stopping a server.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Bind failed for a reason other than the port being taken.
    #[error("Failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("Invalid listen host '{0}'")]
    InvalidHost(String),

    #[error("Failed to read local address: {0}")]
    LocalAddr(#[source] io::Error),

    #[error("Server error: {0}")]
    Serve(#[source] io::Error),

    #[error("Server task failed: {0}")]
    Task(String),
}

/// Observable state of a [`LifecycleController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unbound,
    Listening(SocketAddr),
    Closed,
    Failed,
}

/// Pick the port to listen on.
///
/// An explicit port wins, then the configured port, then the fixed test port
/// when running under the test environment. `None` means no server should be
/// started. Port `0` asks the OS for an ephemeral port.
pub fn resolve_port(explicit: Option<u16>, config: &ServerConfig) -> Option<u16> {
    explicit.or(config.listener.port).or_else(|| {
        (config.environment == Environment::Test).then_some(Environment::TEST_PORT)
    })
}

/// A listening server. Owned exclusively by whoever started it.
///
/// Dropping the handle without calling [`ServerHandle::close`] also stops the
/// server, but does not wait for connections to drain.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<io::Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Whether the serving task is still running.
    pub fn is_listening(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop accepting connections and wait until in-flight ones have drained
    /// and the socket is closed.
    pub async fn close(self) -> Result<(), LifecycleError> {
        self.shutdown.trigger();
        let result = match self.task.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(LifecycleError::Serve(e)),
            Err(e) => Err(LifecycleError::Task(e.to_string())),
        };
        tracing::info!(port = self.local_addr.port(), "Server closed");
        result
    }
}

/// Bind `host:port` and start serving `app`.
///
/// Returns `Ok(None)` when the port is already in use; any other bind
/// failure is an error.
pub async fn listen(app: Router, host: IpAddr, port: u16) -> Result<Option<ServerHandle>, LifecycleError> {
    let listener = match TcpListener::bind(SocketAddr::new(host, port)).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
            tracing::warn!(port, "Port is already in use");
            return Ok(None);
        }
        Err(source) => {
            tracing::error!(port, error = %source, "Failed to bind listener");
            return Err(LifecycleError::Bind { port, source });
        }
    };
    let local_addr = listener.local_addr().map_err(LifecycleError::LocalAddr)?;

    let shutdown = Shutdown::new();
    let signal = shutdown.signal();
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
    });

    tracing::info!(address = %local_addr, port = local_addr.port(), "Server is running");
    Ok(Some(ServerHandle {
        local_addr,
        shutdown,
        task,
    }))
}

/// Owns at most one live [`ServerHandle`] at a time.
pub struct LifecycleController {
    app: Router,
    config: ServerConfig,
    current: Option<ServerHandle>,
    state: LifecycleState,
}

impl LifecycleController {
    pub fn new(app: Router, config: ServerConfig) -> Self {
        Self {
            app,
            config,
            current: None,
            state: LifecycleState::Unbound,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.current.as_ref().map(ServerHandle::local_addr)
    }

    /// Start listening, closing any previous handle first.
    ///
    /// Resolves to the bound address, or `None` when no port is configured
    /// or the port is already in use.
    pub async fn start(&mut self, port: Option<u16>) -> Result<Option<SocketAddr>, LifecycleError> {
        self.reset().await?;

        let Some(port) = resolve_port(port, &self.config) else {
            tracing::info!("No port configured, server not started");
            self.state = LifecycleState::Unbound;
            return Ok(None);
        };

        let host: IpAddr = match self.config.listener.host.parse() {
            Ok(host) => host,
            Err(_) => {
                self.state = LifecycleState::Failed;
                return Err(LifecycleError::InvalidHost(self.config.listener.host.clone()));
            }
        };

        match listen(self.app.clone(), host, port).await {
            Ok(Some(handle)) => {
                let addr = handle.local_addr();
                self.current = Some(handle);
                self.state = LifecycleState::Listening(addr);
                Ok(Some(addr))
            }
            Ok(None) => {
                self.state = LifecycleState::Unbound;
                Ok(None)
            }
            Err(e) => {
                self.state = LifecycleState::Failed;
                Err(e)
            }
        }
    }

    /// Close the current handle, if any. A no-op when nothing is listening.
    pub async fn close(&mut self) -> Result<(), LifecycleError> {
        let Some(handle) = self.current.take() else {
            return Ok(());
        };
        self.state = LifecycleState::Closed;
        handle.close().await
    }

    /// Close whatever is running so a fresh start can take its place.
    pub async fn reset(&mut self) -> Result<(), LifecycleError> {
        self.close().await
    }
}
