//! Request dispatch: shaping, execution and classification.

use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;
use url::Url;

use super::request::set_header;
use super::{
    HttpExecutor, HttpRequest, OutboundRequest, RequestContext, HEADER_CONTENT_TYPE,
    HEADER_ORGANIZATION_UNIT_ID, HEADER_TENANT_NAME,
};
use crate::errors::{classify, is_success, OrchestratorResult};
use crate::observability::{log_request, log_response};

/// Sends requests through an [`HttpExecutor`] and classifies the responses.
///
/// The dispatcher attaches no credentials of its own; bearer tokens are added
/// by the client before a request reaches it.
pub struct Dispatcher {
    executor: Arc<dyn HttpExecutor>,
}

impl Dispatcher {
    /// Creates a dispatcher over an executor.
    pub fn new(executor: Arc<dyn HttpExecutor>) -> Self {
        Self { executor }
    }

    /// Sends a request.
    ///
    /// Returns the body verbatim for 200, 201 and 204. Any other status is
    /// turned into an error that carries the body.
    #[instrument(
        name = "orchestrator.send",
        skip_all,
        fields(method = %request.method, url = %request.url, request_id = %uuid::Uuid::new_v4())
    )]
    pub async fn send(
        &self,
        request: OutboundRequest,
        context: &RequestContext,
    ) -> OrchestratorResult<Bytes> {
        let http_request = prepare(request, context)?;
        log_request(http_request.method, &http_request.url, &http_request.headers);

        let started = Instant::now();
        let response = self.executor.execute(http_request).await?;
        log_response(response.status, started.elapsed(), response.body.len());

        if is_success(response.status) {
            Ok(response.body)
        } else {
            Err(classify(response.status, response.body))
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish()
    }
}

/// Resolves the URL and headers of a request for the executor.
fn prepare(request: OutboundRequest, context: &RequestContext) -> OrchestratorResult<HttpRequest> {
    let mut url = Url::parse(&request.url)?;
    if !request.query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &request.query {
            pairs.append_pair(key, value);
        }
    }

    let mut headers = request.headers;
    if !headers
        .keys()
        .any(|k| k.eq_ignore_ascii_case(HEADER_CONTENT_TYPE))
    {
        headers.insert(
            HEADER_CONTENT_TYPE.to_string(),
            mime::APPLICATION_JSON.to_string(),
        );
    }
    set_header(
        &mut headers,
        HEADER_TENANT_NAME.to_string(),
        context.tenant_name.clone(),
    );
    if let Some(organization_unit_id) = context.organization_unit_id {
        set_header(
            &mut headers,
            HEADER_ORGANIZATION_UNIT_ID.to_string(),
            organization_unit_id.to_string(),
        );
    }

    Ok(HttpRequest {
        method: request.method,
        url: url.into(),
        headers,
        body: request.body.map(|body| body.into_bytes()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::OrchestratorError;
    use crate::mocks::{MockExecutor, MockResponse};
    use crate::transport::{HttpMethod, HEADER_AUTHORIZATION};

    fn dispatcher(executor: &Arc<MockExecutor>) -> Dispatcher {
        Dispatcher::new(Arc::clone(executor) as Arc<dyn HttpExecutor>)
    }

    #[test]
    fn test_prepare_encodes_query_parameters() {
        let request = OutboundRequest::get("https://cloud.example.com/org/tenant/odata/Assets")
            .query("$filter", "Name eq 'Invoice Path'")
            .query("$top", "1");

        let prepared = prepare(request, &RequestContext::new("Tenant")).unwrap();

        assert_eq!(
            prepared.url,
            "https://cloud.example.com/org/tenant/odata/Assets?%24filter=Name+eq+%27Invoice+Path%27&%24top=1"
        );
    }

    #[test]
    fn test_prepare_keeps_existing_query_string() {
        let request = OutboundRequest::get("https://cloud.example.com/odata/Assets?$count=true")
            .query("$top", "5");

        let prepared = prepare(request, &RequestContext::new("Tenant")).unwrap();
        assert_eq!(
            prepared.url,
            "https://cloud.example.com/odata/Assets?$count=true&%24top=5"
        );
    }

    #[test]
    fn test_prepare_defaults_content_type() {
        let prepared = prepare(
            OutboundRequest::get("https://cloud.example.com/odata/Folders"),
            &RequestContext::new("Tenant"),
        )
        .unwrap();

        assert_eq!(
            prepared.headers.get(HEADER_CONTENT_TYPE).map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_prepare_keeps_caller_content_type() {
        let request = OutboundRequest::post("https://id.example.com/token")
            .header("content-type", "application/x-www-form-urlencoded");

        let prepared = prepare(request, &RequestContext::new("Tenant")).unwrap();

        assert_eq!(prepared.headers.len(), 2);
        assert_eq!(
            prepared.headers.get("content-type").map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_prepare_attaches_context_headers() {
        let request = OutboundRequest::get("https://cloud.example.com/odata/Assets")
            .header("x-uipath-tenantname", "Spoofed");
        let context = RequestContext::new("Production").with_organization_unit(1234567);

        let prepared = prepare(request, &context).unwrap();

        assert_eq!(
            prepared.headers.get(HEADER_TENANT_NAME).map(String::as_str),
            Some("Production")
        );
        assert!(!prepared.headers.contains_key("x-uipath-tenantname"));
        assert_eq!(
            prepared
                .headers
                .get(HEADER_ORGANIZATION_UNIT_ID)
                .map(String::as_str),
            Some("1234567")
        );
    }

    #[test]
    fn test_prepare_rejects_relative_url() {
        let result = prepare(OutboundRequest::get("/hoge"), &RequestContext::new("Tenant"));
        assert!(matches!(result, Err(OrchestratorError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_send_returns_body_on_success() {
        let executor = Arc::new(MockExecutor::new());
        executor.queue(MockResponse::new(201, r#"{"Id":7}"#));

        let body = dispatcher(&executor)
            .send(
                OutboundRequest::post("https://cloud.example.com/odata/Assets"),
                &RequestContext::new("Tenant"),
            )
            .await
            .unwrap();

        assert_eq!(&body[..], br#"{"Id":7}"#);
        let recorded = executor.last_request().unwrap();
        assert_eq!(recorded.method, HttpMethod::Post);
        assert!(recorded.body.is_none());
        assert!(!recorded.headers.contains_key(HEADER_AUTHORIZATION));
    }

    #[tokio::test]
    async fn test_send_no_content() {
        let executor = Arc::new(MockExecutor::new());
        executor.queue(MockResponse::empty(204));

        let body = dispatcher(&executor)
            .send(
                OutboundRequest::put("https://cloud.example.com/odata/Assets(7)"),
                &RequestContext::new("Tenant"),
            )
            .await
            .unwrap();

        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_send_empty_unauthorized() {
        let executor = Arc::new(MockExecutor::new());
        executor.queue(MockResponse::empty(401));

        let error = dispatcher(&executor)
            .send(
                OutboundRequest::get("https://cloud.example.com/hoge"),
                &RequestContext::new("Tenant"),
            )
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "HTTP Error 401: Unauthorized");
        assert_eq!(error.body().map(|b| b.len()), Some(0));
    }

    #[tokio::test]
    async fn test_send_propagates_transport_error() {
        let executor = Arc::new(MockExecutor::new());
        executor.queue_failure(crate::transport::TransportError::Connection {
            message: "connection refused".to_string(),
        });

        let error = dispatcher(&executor)
            .send(
                OutboundRequest::get("https://cloud.example.com/odata/Folders"),
                &RequestContext::new("Tenant"),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            OrchestratorError::Transport(crate::transport::TransportError::Connection { .. })
        ));
    }
}
