//! JSON test server binary.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client Request
//!   ──────────────▶ lifecycle (listener) ─▶ http::server layers
//!                                              │ trace / request id / timeout
//!                                              ▼
//!                                          http::body  ──▶ 400 / 413
//!                                              │
//!                                              ▼
//!                                          http::error (error stage)
//!                                              │
//!                                              ▼
//!                                          http::handlers (routes, 404)
//! ```

use clap::Parser;
use std::path::PathBuf;

use json_test_server::config::load_config;
use json_test_server::http::build_router;
use json_test_server::lifecycle::{signals::shutdown_signal, LifecycleController};
use json_test_server::observability::init_logging;

#[derive(Parser)]
#[command(name = "json-test-server")]
#[command(about = "Minimal JSON test server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port; overrides PORT and the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("Logging already initialised: {e}");
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        port = ?config.listener.port,
        log_format = ?config.observability.log_format,
        "json-test-server starting"
    );

    let app = build_router(config.clone());
    let mut controller = LifecycleController::new(app, config);

    let Some(addr) = controller.start(cli.port).await? else {
        tracing::info!("No server running, exiting");
        return Ok(());
    };
    tracing::info!(address = %addr, "Listening for connections");

    shutdown_signal().await;
    controller.close().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
