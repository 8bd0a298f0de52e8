//! Shared test helpers for gateway integration tests

use std::io::Write;

use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portsync_gateway::PORT_FORWARDED_PATH;

/// Starts a mock gateway that reports `port` as forwarded.
pub async fn gateway_reporting(port: u16) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PORT_FORWARDED_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "port": port })))
        .mount(&server)
        .await;

    server
}

/// Starts a mock gateway that answers every query with `template`.
pub async fn gateway_responding(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PORT_FORWARDED_PATH))
        .respond_with(template)
        .mount(&server)
        .await;

    server
}

/// Writes `content` to a fresh temporary port file.
pub fn port_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp port file");
    file.write_all(content.as_bytes())
        .expect("write temp port file");
    file
}

/// A gateway URL nothing listens on.
pub fn unreachable_gateway() -> String {
    "http://127.0.0.1:1".to_string()
}
