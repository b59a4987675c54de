//! Shared utilities for integration tests.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use json_test_server::config::{Environment, ServerConfig};
use json_test_server::http::build_router;
use json_test_server::lifecycle::{listen, ServerHandle};

pub const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Config bound to localhost in the given environment.
pub fn local_config(environment: Environment) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.host = LOCALHOST.to_string();
    config.environment = environment;
    config
}

/// Start a server on an ephemeral localhost port.
pub async fn start_server(environment: Environment) -> ServerHandle {
    start_with_config(local_config(environment)).await
}

/// Start a server with an explicit config on an ephemeral localhost port.
#[allow(dead_code)]
pub async fn start_with_config(config: ServerConfig) -> ServerHandle {
    listen(build_router(config), LOCALHOST, 0)
        .await
        .expect("bind ephemeral port")
        .expect("ephemeral port is never in use")
}

/// Client that never reuses connections, so closed servers are observed
/// immediately.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}
