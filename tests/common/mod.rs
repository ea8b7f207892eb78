//! Shared helpers for the integration tests.

#![allow(dead_code)]

use orchestrator_client::{Credentials, FallbackPolicy, OrchestratorClient};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TENANT: &str = "DefaultTenant";
pub const IDENTITY_PATH: &str = "/identity_/connect/token";
pub const LEGACY_PATH: &str = "/oauth/token";

pub fn credentials() -> Credentials {
    Credentials::new(TENANT)
        .application("app-id", "app-secret")
        .scopes("OR.Assets OR.Queues OR.Folders.Read")
        .legacy("client-id", "user-key")
}

pub fn client(server: &MockServer) -> OrchestratorClient {
    client_with(server, FallbackPolicy::default(), Duration::from_secs(5))
}

pub fn client_with(
    server: &MockServer,
    policy: FallbackPolicy,
    timeout: Duration,
) -> OrchestratorClient {
    OrchestratorClient::builder()
        .base_url(format!("{}/odata", server.uri()))
        .identity_url(format!("{}{}", server.uri(), IDENTITY_PATH))
        .legacy_identity_url(format!("{}{}", server.uri(), LEGACY_PATH))
        .credentials(credentials())
        .fallback_policy(policy)
        .timeout(timeout)
        .build()
        .expect("client should build")
}

pub fn token_body(access_token: &str, expires_in: u64) -> Value {
    json!({
        "access_token": access_token,
        "id_token": "",
        "expires_in": expires_in,
        "token_type": "Bearer",
        "scope": "OR.Assets OR.Queues OR.Folders.Read"
    })
}

/// Mounts a primary token endpoint that must be hit `times` times.
pub async fn mount_token(server: &MockServer, access_token: &str, expires_in: u64, times: u64) {
    Mock::given(method("POST"))
        .and(path(IDENTITY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(access_token, expires_in)))
        .expect(times)
        .mount(server)
        .await;
}
