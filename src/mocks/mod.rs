//! Mock implementations for testing.
//!
//! [`MockExecutor`] stands in for the network: it answers from a FIFO queue
//! of canned responses, or from sticky per-URL routes, and records every
//! request it receives.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::transport::{HttpExecutor, HttpMethod, HttpRequest, HttpResponse, TransportError};

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Full URL, query string included.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Vec<u8>>,
}

impl RecordedRequest {
    /// Returns the value of a header, matched without regard to case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the body as UTF-8 text.
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|body| String::from_utf8_lossy(body).into_owned())
    }

    /// Decodes the body as JSON.
    pub fn body_json(&self) -> Option<serde_json::Value> {
        self.body
            .as_ref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl MockResponse {
    /// Creates a response with a text body.
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    /// Creates a response with no body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Creates a JSON response.
    pub fn json<T: serde::Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status,
            headers,
            body: Bytes::from(body),
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

type Outcome = Result<MockResponse, TransportError>;

/// Mock HTTP executor for testing.
///
/// Routes are matched by URL prefix (query string included) and answer every
/// matching request; they take precedence over the queue. Unmatched requests
/// consume the queue in order. With neither, the executor fails with a
/// connection error.
pub struct MockExecutor {
    queue: Mutex<VecDeque<Outcome>>,
    routes: Mutex<Vec<(String, Outcome)>>,
    requests: Mutex<Vec<RecordedRequest>>,
    delay: Option<Duration>,
}

impl MockExecutor {
    /// Creates a new mock executor.
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            routes: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Delays every response, giving concurrent callers time to pile up.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.queue).push_back(Ok(response));
    }

    /// Queues a JSON response with status 200.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(200, value));
    }

    /// Queues a transport failure.
    pub fn queue_failure(&self, error: TransportError) {
        lock(&self.queue).push_back(Err(error));
    }

    /// Answers every request whose URL starts with `url_prefix`.
    pub fn route(&self, url_prefix: impl Into<String>, response: MockResponse) {
        lock(&self.routes).push((url_prefix.into(), Ok(response)));
    }

    /// Fails every request whose URL starts with `url_prefix`.
    pub fn route_failure(&self, url_prefix: impl Into<String>, error: TransportError) {
        lock(&self.routes).push((url_prefix.into(), Err(error)));
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the recorded requests whose URL starts with `url_prefix`.
    pub fn requests_to(&self, url_prefix: &str) -> Vec<RecordedRequest> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.url.starts_with(url_prefix))
            .cloned()
            .collect()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Clears recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    fn next_outcome(&self, url: &str) -> Outcome {
        let routed = lock(&self.routes)
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, outcome)| outcome.clone());

        routed
            .or_else(|| lock(&self.queue).pop_front())
            .unwrap_or_else(|| {
                Err(TransportError::Connection {
                    message: format!("No mock response configured for {}", url),
                })
            })
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpExecutor for MockExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let outcome = self.next_outcome(&request.url);
        lock(&self.requests).push(RecordedRequest {
            method: request.method,
            url: request.url,
            headers: request.headers,
            body: request.body,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        outcome.map(|response| HttpResponse {
            status: response.status,
            headers: response.headers,
            body: response.body,
        })
    }
}

impl std::fmt::Debug for MockExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockExecutor")
            .field("request_count", &self.request_count())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Test fixtures for common response payloads.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::types::{Asset, AssetValueScope, AssetValueType, Folder, ODataList, QueueItem};

    /// Creates an identity token response.
    pub fn token_response(access_token: &str, expires_in: u64) -> Value {
        json!({
            "access_token": access_token,
            "id_token": "",
            "expires_in": expires_in,
            "token_type": "Bearer",
            "scope": "OR.Assets OR.Queues OR.Folders.Read"
        })
    }

    /// Creates a stored text asset.
    pub fn asset(id: u64, name: &str) -> Asset {
        Asset {
            id,
            name: name.to_string(),
            can_be_deleted: true,
            value_scope: Some(AssetValueScope::Global),
            value_type: AssetValueType::Text,
            value: Some("value".to_string()),
            string_value: Some("value".to_string()),
            ..Default::default()
        }
    }

    /// Creates a stored queue item.
    pub fn queue_item(id: u64, queue_name: &str) -> QueueItem {
        QueueItem {
            id,
            queue_definition_id: 12,
            status: Some("New".to_string()),
            reference: Some(format!("REF-{}", id)),
            ..QueueItem::new(queue_name)
        }
    }

    /// Creates a folder.
    pub fn folder(id: u64, path: &str) -> Folder {
        Folder {
            id,
            key: format!("00000000-0000-4000-8000-{:012}", id),
            display_name: path.rsplit('/').next().unwrap_or(path).to_string(),
            fully_qualified_name: path.to_string(),
            ..Default::default()
        }
    }

    /// Wraps entities in an OData envelope.
    pub fn odata_list<T>(value: Vec<T>) -> ODataList<T> {
        ODataList {
            count: value.len() as u64,
            value,
        }
    }
}
