//! Shared fixtures for HTTP tests against a local mock server.

#![allow(dead_code)]

use runscope_lib::{Client, ClientOptions};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// Start a mock server and a client pointed at it.
pub async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let client = Client::new(ClientOptions::new(TOKEN).base_url(server.uri()))
        .expect("client for mock server");
    (server, client)
}

/// Wrap `data` in a successful envelope.
pub fn envelope(data: Value) -> Value {
    json!({
        "data": data,
        "error": null,
        "meta": {"status": "success"}
    })
}

/// An envelope carrying an error message.
pub fn error_envelope(status: u16, message: &str) -> Value {
    json!({
        "data": null,
        "error": {"status": status, "message": message},
        "meta": {"status": "error"}
    })
}
