//! OAuth grants against the identity service.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::{AuthResult, AuthStrategy, Authenticator, FallbackPolicy};
use crate::config::Credentials;
use crate::errors::{decode, OrchestratorError, OrchestratorResult};
use crate::transport::{Dispatcher, OutboundRequest, RequestContext};

/// Token endpoint of the identity service.
pub const OAUTH_URL: &str = "https://cloud.uipath.com/identity_/connect/token";

/// Token endpoint of the deprecated account service.
pub const DEPRECATED_OAUTH_URL: &str = "https://account.uipath.com/oauth/token";

/// Token endpoints for both grant protocols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityEndpoints {
    /// Client credentials endpoint.
    pub current: String,
    /// Refresh-token endpoint.
    pub legacy: String,
}

impl Default for IdentityEndpoints {
    fn default() -> Self {
        Self {
            current: OAUTH_URL.to_string(),
            legacy: DEPRECATED_OAUTH_URL.to_string(),
        }
    }
}

#[derive(Serialize)]
struct RefreshTokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    refresh_token: &'a str,
}

/// [`Authenticator`] that talks to the identity service over HTTP.
///
/// Token requests go through the same [`Dispatcher`] as business calls but
/// never carry a bearer token.
pub struct OAuthAuthenticator {
    dispatcher: Arc<Dispatcher>,
    endpoints: IdentityEndpoints,
    policy: FallbackPolicy,
}

impl OAuthAuthenticator {
    /// Creates an authenticator with the default fallback policy.
    pub fn new(dispatcher: Arc<Dispatcher>, endpoints: IdentityEndpoints) -> Self {
        Self {
            dispatcher,
            endpoints,
            policy: FallbackPolicy::default(),
        }
    }

    /// Sets the fallback policy.
    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the fallback policy.
    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Runs one grant, with no fallback.
    #[instrument(skip(self, credentials), fields(tenant = %credentials.tenant_name()))]
    pub async fn request_token(
        &self,
        strategy: AuthStrategy,
        credentials: &Credentials,
    ) -> OrchestratorResult<AuthResult> {
        let request = match strategy {
            AuthStrategy::Current => self.client_credentials_request(credentials)?,
            AuthStrategy::Legacy => self.refresh_token_request(credentials)?,
        };

        let context = RequestContext::new(credentials.tenant_name());
        let body = self.dispatcher.send(request, &context).await?;
        let result: AuthResult = decode(&body)?;

        if result.access_token.is_empty() {
            return Err(OrchestratorError::EmptyAccessToken);
        }

        debug!(
            strategy = %strategy,
            expires_in = result.expires_in,
            "Access token issued"
        );
        Ok(result)
    }

    fn client_credentials_request(
        &self,
        credentials: &Credentials,
    ) -> OrchestratorResult<OutboundRequest> {
        let (application_id, application_secret) = match (
            credentials.application_id(),
            credentials.application_secret.as_ref(),
        ) {
            (Some(id), Some(secret)) => (id, secret),
            _ => {
                return Err(OrchestratorError::configuration(
                    "Application ID and secret are required for the client credentials grant",
                ))
            }
        };

        Ok(OutboundRequest::post(&self.endpoints.current).form([
            ("grant_type", "client_credentials"),
            ("client_id", application_id),
            ("client_secret", application_secret.expose_secret().as_str()),
            ("scope", credentials.requested_scopes()),
        ]))
    }

    fn refresh_token_request(
        &self,
        credentials: &Credentials,
    ) -> OrchestratorResult<OutboundRequest> {
        let (client_id, user_key) = match (credentials.client_id(), credentials.user_key.as_ref())
        {
            (Some(id), Some(key)) => (id, key),
            _ => {
                return Err(OrchestratorError::configuration(
                    "Client ID and user key are required for the refresh token grant",
                ))
            }
        };

        OutboundRequest::post(&self.endpoints.legacy).json(&RefreshTokenRequest {
            grant_type: "refresh_token",
            client_id,
            refresh_token: user_key.expose_secret(),
        })
    }
}

#[async_trait]
impl Authenticator for OAuthAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> OrchestratorResult<AuthResult> {
        let primary_error = match self.request_token(self.policy.primary, credentials).await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        match self.policy.fallback {
            Some(fallback) => {
                warn!(
                    strategy = %self.policy.primary,
                    fallback = %fallback,
                    error = %primary_error,
                    "Authentication failed, falling back"
                );
                self.request_token(fallback, credentials).await
            }
            None => Err(primary_error),
        }
    }
}

impl std::fmt::Debug for OAuthAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthAuthenticator")
            .field("endpoints", &self.endpoints)
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{fixtures, MockExecutor, MockResponse};
    use crate::transport::{HttpExecutor, HttpMethod, HEADER_AUTHORIZATION, HEADER_TENANT_NAME};

    const CURRENT: &str = "https://id.example.com/identity_/connect/token";
    const LEGACY: &str = "https://account.example.com/oauth/token";

    fn credentials() -> Credentials {
        Credentials::new("DefaultTenant")
            .application("app-id", "app-secret")
            .scopes("OR.Assets OR.Queues")
            .legacy("client-id", "user-key")
    }

    fn authenticator(executor: &Arc<MockExecutor>) -> OAuthAuthenticator {
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(executor) as Arc<dyn HttpExecutor>
        ));
        OAuthAuthenticator::new(
            dispatcher,
            IdentityEndpoints {
                current: CURRENT.to_string(),
                legacy: LEGACY.to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_client_credentials_request_shape() {
        let executor = Arc::new(MockExecutor::new());
        executor.queue(MockResponse::json(200, &fixtures::token_response("abc", 3600)));

        let result = authenticator(&executor)
            .authenticate(&credentials())
            .await
            .unwrap();
        assert_eq!(result.access_token, "abc");

        let request = executor.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, CURRENT);
        assert_eq!(
            request.body_text().unwrap(),
            "grant_type=client_credentials&client_id=app-id&client_secret=app-secret&scope=OR.Assets+OR.Queues"
        );
        assert_eq!(
            request.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(request.header(HEADER_TENANT_NAME), Some("DefaultTenant"));
        assert!(request.header(HEADER_AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_null_token_fields_do_not_trigger_fallback() {
        let executor = Arc::new(MockExecutor::new());
        executor.queue_json(&serde_json::json!({
            "access_token": "abc",
            "id_token": null,
            "scope": null,
            "expires_in": 3600,
            "token_type": "Bearer"
        }));

        let result = authenticator(&executor)
            .authenticate(&credentials())
            .await
            .unwrap();

        assert_eq!(result.access_token, "abc");
        assert!(result.scope.is_empty());
        assert!(executor.requests_to(LEGACY).is_empty());
    }

    #[tokio::test]
    async fn test_fallback_after_primary_failure() {
        let executor = Arc::new(MockExecutor::new());
        executor.queue(MockResponse::new(
            400,
            r#"{"error":"invalid_client","error_description":"unknown client"}"#,
        ));
        executor.queue(MockResponse::json(200, &fixtures::token_response("legacy", 86400)));

        let result = authenticator(&executor)
            .authenticate(&credentials())
            .await
            .unwrap();

        assert_eq!(result.access_token, "legacy");
        let requests = executor.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].url, LEGACY);
        assert_eq!(
            requests[1].body_json().unwrap(),
            serde_json::json!({
                "grant_type": "refresh_token",
                "client_id": "client-id",
                "refresh_token": "user-key"
            })
        );
        assert_eq!(requests[1].header("Content-Type"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_fallback_error_is_returned() {
        let executor = Arc::new(MockExecutor::new());
        executor.queue(MockResponse::empty(500));
        executor.queue(MockResponse::empty(401));

        let error = authenticator(&executor)
            .authenticate(&credentials())
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "HTTP Error 401: Unauthorized");
        assert_eq!(executor.request_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_token_is_rejected() {
        let executor = Arc::new(MockExecutor::new());
        executor.queue(MockResponse::new(201, r#"{"access_token":"","expires_in":3600}"#));

        let error = authenticator(&executor)
            .with_policy(FallbackPolicy::only(AuthStrategy::Current))
            .authenticate(&credentials())
            .await
            .unwrap_err();

        assert!(matches!(error, OrchestratorError::EmptyAccessToken));
    }

    #[tokio::test]
    async fn test_missing_application_credentials_falls_back() {
        let executor = Arc::new(MockExecutor::new());
        executor.queue(MockResponse::json(200, &fixtures::token_response("legacy", 60)));
        let credentials = Credentials::new("DefaultTenant").legacy("client-id", "user-key");

        let result = authenticator(&executor)
            .authenticate(&credentials)
            .await
            .unwrap();

        assert_eq!(result.access_token, "legacy");
        assert_eq!(executor.request_count(), 1);
        assert_eq!(executor.last_request().unwrap().url, LEGACY);
    }
}
