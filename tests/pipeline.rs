//! End-to-end tests of the authenticated request pipeline against a local
//! HTTP server.

mod common;

use common::{client, client_with, mount_token, token_body, IDENTITY_PATH, LEGACY_PATH, TENANT};
use orchestrator_client::{
    Asset, AuthStrategy, FallbackPolicy, OrchestratorClient, OrchestratorError, OutboundRequest,
    TransportError,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

async fn get_folders(client: &OrchestratorClient) -> Result<bytes::Bytes, OrchestratorError> {
    client
        .send_with_authorization(
            OutboundRequest::get(client.endpoint_url("Folders")),
            &client.context(),
        )
        .await
}

#[tokio::test]
async fn cached_token_is_reused() {
    let server = MockServer::start().await;
    mount_token(&server, "token-abc", 3600, 1).await;
    Mock::given(method("GET"))
        .and(path("/odata/Folders"))
        .and(header("Authorization", "Bearer token-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"@odata.count": 0, "value": []})))
        .expect(3)
        .mount(&server)
        .await;

    let client = client(&server);
    for _ in 0..3 {
        get_folders(&client).await.unwrap();
    }
}

#[tokio::test]
async fn cache_miss_authenticates_before_business_call() {
    let server = MockServer::start().await;
    mount_token(&server, "token-abc", 3600, 1).await;
    Mock::given(method("GET"))
        .and(path("/odata/Folders"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    get_folders(&client(&server)).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url.path(), IDENTITY_PATH);
    assert_eq!(
        String::from_utf8_lossy(&requests[0].body),
        "grant_type=client_credentials&client_id=app-id&client_secret=app-secret&scope=OR.Assets+OR.Queues+OR.Folders.Read"
    );
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(requests[1].url.path(), "/odata/Folders");
}

#[tokio::test]
async fn fallback_runs_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(IDENTITY_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Client authentication failed"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(LEGACY_PATH))
        .and(body_json(json!({
            "grant_type": "refresh_token",
            "client_id": "client-id",
            "refresh_token": "user-key"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("legacy-token", 86400)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/odata/Folders"))
        .and(header("Authorization", "Bearer legacy-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    get_folders(&client).await.unwrap();
    get_folders(&client).await.unwrap();
}

#[tokio::test]
async fn fallback_failure_is_returned_and_request_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(IDENTITY_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(LEGACY_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/odata/Folders"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = get_folders(&client(&server)).await.unwrap_err();

    assert_eq!(error.to_string(), "HTTP Error 401: Unauthorized");
    assert!(error.is_auth_failure());
}

#[test_case(FallbackPolicy::only(AuthStrategy::Current) ; "primary only")]
#[test_case(FallbackPolicy::default() ; "with fallback")]
#[tokio::test]
async fn empty_access_token_is_rejected(policy: FallbackPolicy) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(IDENTITY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("", 3600)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(LEGACY_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"access_token": ""})))
        .mount(&server)
        .await;
    Mock::given(path("/odata/Folders"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_with(&server, policy, Duration::from_secs(5));
    let error = get_folders(&client).await.unwrap_err();

    assert!(matches!(error, OrchestratorError::EmptyAccessToken));
    assert_eq!(error.to_string(), "Empty Access Token Error");
}

#[test_case(200, true ; "ok")]
#[test_case(201, true ; "created")]
#[test_case(204, true ; "no content")]
#[test_case(202, false ; "accepted")]
#[test_case(301, false ; "moved permanently")]
#[test_case(404, false ; "not found")]
#[test_case(503, false ; "service unavailable")]
#[tokio::test]
async fn status_classification(status: u16, success: bool) {
    let server = MockServer::start().await;
    mount_token(&server, "token", 3600, 1).await;
    Mock::given(method("GET"))
        .and(path("/odata/Folders"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;

    let result = get_folders(&client(&server)).await;

    assert_eq!(result.is_ok(), success);
    if let Err(error) = result {
        assert_eq!(error.status(), Some(status));
        assert_eq!(error.body().map(|b| b.len()), Some(0));
    }
}

#[tokio::test]
async fn empty_unauthorized_response() {
    let server = MockServer::start().await;
    mount_token(&server, "token", 3600, 1).await;
    Mock::given(path("/odata/Folders"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let error = get_folders(&client(&server)).await.unwrap_err();

    assert_eq!(error.to_string(), "HTTP Error 401: Unauthorized");
}

#[tokio::test]
async fn oauth_style_error_rendering() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(IDENTITY_PATH))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"error":"invalid_scope","error_description":"scope X not allowed"}"#),
        )
        .mount(&server)
        .await;

    let client = client_with(
        &server,
        FallbackPolicy::only(AuthStrategy::Current),
        Duration::from_secs(5),
    );
    let error = get_folders(&client).await.unwrap_err();

    assert_eq!(
        error.to_string(),
        "Request Failed: Error Code(invalid_scope) scope X not allowed"
    );
    assert_eq!(error.status(), Some(400));
}

#[tokio::test]
async fn orchestrator_error_rendering() {
    let server = MockServer::start().await;
    mount_token(&server, "token", 3600, 1).await;
    Mock::given(method("POST"))
        .and(path("/odata/Queues/UiPathODataSvc.AddQueueItem"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_string(r#"{"errorCode":1001,"message":"duplicate reference"}"#),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    let error = client
        .queue_items(1)
        .store(orchestrator_client::QueueItem::new("Invoices").with_reference("dup"))
        .await
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "Request Failed: Error Code(1001) duplicate reference"
    );
    let body = error.body().unwrap();
    assert_eq!(&body[..], br#"{"errorCode":1001,"message":"duplicate reference"}"#);
}

#[tokio::test]
async fn malformed_error_body_is_a_decode_error() {
    let server = MockServer::start().await;
    mount_token(&server, "token", 3600, 1).await;
    Mock::given(path("/odata/Folders"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let error = get_folders(&client(&server)).await.unwrap_err();

    match error {
        OrchestratorError::Decode { status, body, .. } => {
            assert_eq!(status, Some(502));
            assert_eq!(&body[..], b"<html>Bad Gateway</html>");
        }
        other => panic!("Expected decode error, got {:?}", other),
    }
}

#[tokio::test]
async fn context_headers_are_attached() {
    let server = MockServer::start().await;
    mount_token(&server, "token", 3600, 1).await;
    Mock::given(method("GET"))
        .and(path("/odata/Assets(7)"))
        .and(header("X-UIPATH-TenantName", TENANT))
        .and(header("X-UIPATH-OrganizationUnitId", "1234567"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": 7,
            "Name": "InvoicePath",
            "ValueType": "Text",
            "StringValue": "C:\\invoices"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let asset = client(&server).assets(1234567).get_by_id(7).await.unwrap();

    assert_eq!(asset.string_value.as_deref(), Some("C:\\invoices"));
}

#[tokio::test]
async fn request_without_body_sends_no_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/odata/Jobs/UiPath.Server.Configuration.OData.StopJobs"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let body = client
        .send(
            OutboundRequest::post(client.endpoint_url("Jobs/UiPath.Server.Configuration.OData.StopJobs")),
            &client.context(),
        )
        .await
        .unwrap();

    assert!(body.is_empty());
}

#[tokio::test]
async fn concurrent_callers_share_one_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(IDENTITY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("shared-token", 3600))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/odata/Folders"))
        .and(header("Authorization", "Bearer shared-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(10)
        .mount(&server)
        .await;

    let client = Arc::new(client(&server));
    let calls = (0..10).map(|_| {
        let client = Arc::clone(&client);
        async move { get_folders(&client).await }
    });

    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(Result::is_ok));
}

struct Echo;

impl Respond for Echo {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(201).set_body_bytes(request.body.clone())
    }
}

#[tokio::test]
async fn stored_entity_round_trips() {
    let server = MockServer::start().await;
    mount_token(&server, "token", 3600, 1).await;
    Mock::given(method("POST"))
        .and(path("/odata/Assets"))
        .respond_with(Echo)
        .mount(&server)
        .await;

    let asset = Asset::credential("PortalLogin", "robot", "p@ss")
        .with_description("Invoice portal account");
    let stored = client(&server).assets(1).store(&asset).await.unwrap();

    assert_eq!(stored, asset);
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    let server = MockServer::start().await;
    let client = OrchestratorClient::builder()
        .base_url("http://127.0.0.1:1/odata/")
        .identity_url(format!("{}{}", server.uri(), IDENTITY_PATH))
        .credentials(common::credentials())
        .build()
        .unwrap();

    let error = client
        .send(
            OutboundRequest::get(client.endpoint_url("Folders")),
            &client.context(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        OrchestratorError::Transport(TransportError::Connection { .. })
    ));
}

#[tokio::test]
async fn slow_response_is_a_timeout() {
    let server = MockServer::start().await;
    mount_token(&server, "token", 3600, 1).await;
    Mock::given(path("/odata/Folders"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = client_with(
        &server,
        FallbackPolicy::default(),
        Duration::from_millis(300),
    );
    let error = get_folders(&client).await.unwrap_err();

    assert!(matches!(
        error,
        OrchestratorError::Transport(TransportError::Timeout { .. })
    ));
}
