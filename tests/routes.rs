//! Route table tests over real connections.

use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use json_test_server::config::Environment;

mod common;

#[tokio::test]
async fn root_and_health_are_stable() {
    let server = common::start_server(Environment::Production).await;
    let client = common::client();

    for _ in 0..3 {
        let res = client.get(common::url(server.local_addr(), "/")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        assert_eq!(res.json::<Value>().await.unwrap(), json!({ "message": "Welcome to the test server!" }));

        let res = client.get(common::url(server.local_addr(), "/health")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.json::<Value>().await.unwrap(), json!({ "status": "OK" }));
    }

    server.close().await.unwrap();
}

#[tokio::test]
async fn unmatched_routes_are_not_found() {
    let server = common::start_server(Environment::Production).await;
    let client = common::client();

    let res = client.get(common::url(server.local_addr(), "/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "Not found" }));

    let res = client
        .post(common::url(server.local_addr(), "/"))
        .json(&json!({ "valid": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "Not found" }));

    server.close().await.unwrap();
}

#[tokio::test]
async fn malformed_json_is_rejected_before_routing() {
    let server = common::start_server(Environment::Development).await;
    let client = common::client();

    let res = client
        .post(common::url(server.local_addr(), "/"))
        .header("content-type", "application/json")
        .body(r#"{"malformed":json}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "Invalid JSON" }));

    server.close().await.unwrap();
}

#[tokio::test]
async fn chain_error_uses_header_status() {
    let server = common::start_server(Environment::Production).await;
    let client = common::client();
    let url = common::url(server.local_addr(), "/chain-error");

    let res = client.get(&url).header("x-error-status", "404").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "Internal Server Error" }));

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "Internal Server Error" }));

    server.close().await.unwrap();
}

#[tokio::test]
async fn error_test_route() {
    let server = common::start_server(Environment::Production).await;
    let client = common::client();
    let url = common::url(server.local_addr(), "/error-test");

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = client.get(&url).header("x-error", "1").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await.unwrap()["error"], "Internal Server Error");

    let res = client
        .get(&url)
        .header("x-error", "1")
        .header("x-error-status", "503")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    server.close().await.unwrap();
}

#[tokio::test]
async fn development_mode_exposes_stack() {
    let dev = common::start_server(Environment::Development).await;
    let prod = common::start_server(Environment::Production).await;
    let client = common::client();

    let body: Value = client
        .get(common::url(dev.local_addr(), "/chain-error"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["error"], "Internal Server Error");
    assert!(body["stack"].as_str().unwrap().starts_with("Error: Test error"));

    let body: Value = client
        .get(common::url(prod.local_addr(), "/chain-error"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body.get("stack").is_none());

    dev.close().await.unwrap();
    prod.close().await.unwrap();
}

/// Read one HTTP/1.1 response with a `Content-Length` body.
async fn read_response(stream: &mut TcpStream) -> (String, String) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let head = text[..end].to_string();
            let length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                let body = text[end + 4..end + 4 + length].to_string();
                return (head, body);
            }
        }
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before a full response");
        buf.extend_from_slice(&chunk[..n]);
    }
}

#[tokio::test]
async fn stalled_body_times_out_with_json() {
    let mut config = common::local_config(Environment::Production);
    config.limits.request_timeout_secs = 1;
    let server = common::start_with_config(config).await;

    let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
    stream
        .write_all(
            b"POST / HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: 20\r\n\r\n{\"a\"",
        )
        .await
        .unwrap();

    let (head, body) = tokio::time::timeout(Duration::from_secs(5), read_response(&mut stream))
        .await
        .expect("server answers a stalled body");
    drop(stream);

    assert!(head.starts_with("HTTP/1.1 408"), "unexpected status line: {head}");
    assert!(head.to_ascii_lowercase().contains("content-type: application/json"));
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "error": "Request Timeout" })
    );

    server.close().await.unwrap();
}
