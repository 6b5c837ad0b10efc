//! Shared helpers for client integration tests

#![allow(dead_code, unreachable_pub, clippy::panic)]

use roomspa_client::ApiClient;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::MockServer;

/// Start a mock backend and a client pointed at its `/api/admin` root
pub async fn backend() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::new(format!("{}/api/admin", server.uri()), Duration::from_secs(5))
        .map(|c| c.with_token("test-token"))
        .unwrap_or_else(|e| panic!("client: {e}"));
    (server, client)
}

/// A successful envelope around `data`
pub fn ok(data: Value) -> Value {
    json!({"success": true, "data": data})
}

/// A failed envelope
pub fn rejected(message: &str) -> Value {
    json!({"success": false, "message": message})
}
