//! Orchestrator API client.
//!
//! Provides the authenticated request pipeline and the resource services
//! built on it.

use bytes::Bytes;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::instrument;

use crate::auth::{
    Authenticator, FallbackPolicy, InMemoryTokenCache, OAuthAuthenticator, TokenCache,
    TokenProvider,
};
use crate::config::{Credentials, OrchestratorConfig, OrchestratorConfigBuilder};
use crate::errors::{decode, OrchestratorResult};
use crate::services::{
    AssetsService, FoldersService, QueueDefinitionsService, QueueItemsService,
};
use crate::transport::{
    Dispatcher, HttpExecutor, OutboundRequest, RequestContext, ReqwestExecutor,
    HEADER_AUTHORIZATION,
};

/// The main Orchestrator client.
///
/// One client holds one credential set and one token cache. It is `Send` and
/// `Sync`; share it behind an `Arc` rather than building one per task.
///
/// # Example
///
/// ```rust,no_run
/// use orchestrator_client::{Credentials, OrchestratorClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = OrchestratorClient::builder()
///         .base_url("https://cloud.uipath.com/acme/DefaultTenant/orchestrator_/odata/")
///         .credentials(
///             Credentials::new("DefaultTenant")
///                 .application("app-id", "app-secret")
///                 .scopes("OR.Assets OR.Queues OR.Folders.Read"),
///         )
///         .build()?;
///
///     let (folders, _) = client.folders().list(&[]).await?;
///     let asset = client.assets(folders[0].id).get_by_name("InvoicePath").await?;
///     println!("{:?}", asset);
///     Ok(())
/// }
/// ```
pub struct OrchestratorClient {
    config: OrchestratorConfig,
    dispatcher: Arc<Dispatcher>,
    tokens: TokenProvider,
}

impl OrchestratorClient {
    /// Creates a new client builder.
    pub fn builder() -> OrchestratorClientBuilder {
        OrchestratorClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// See [`OrchestratorConfig::from_env`] for the variables read.
    pub fn from_env() -> OrchestratorResult<Self> {
        OrchestratorClientBuilder::from_config(OrchestratorConfig::from_env()?).build()
    }

    /// Sends a request without authorization.
    ///
    /// The tenant header, and the organization-unit header when the context
    /// has one, are attached. Returns the raw body of a 200, 201 or 204
    /// response.
    pub async fn send(
        &self,
        request: OutboundRequest,
        context: &RequestContext,
    ) -> OrchestratorResult<Bytes> {
        self.dispatcher.send(request, context).await
    }

    /// Sends a request with a bearer token.
    ///
    /// The token comes from the cache, or from a fresh authentication when
    /// the cache holds none. If no token can be obtained the request is not
    /// sent.
    #[instrument(name = "orchestrator.send_with_authorization", skip_all)]
    pub async fn send_with_authorization(
        &self,
        request: OutboundRequest,
        context: &RequestContext,
    ) -> OrchestratorResult<Bytes> {
        let token = self.tokens.access_token().await?;
        let request = request.header(
            HEADER_AUTHORIZATION,
            format!("Bearer {}", token.expose_secret()),
        );
        self.dispatcher.send(request, context).await
    }

    /// Sends an authorized request and decodes the JSON response.
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        request: OutboundRequest,
        context: &RequestContext,
    ) -> OrchestratorResult<T> {
        let body = self.send_with_authorization(request, context).await?;
        decode(&body)
    }

    /// Returns a context for the configured tenant with no folder scope.
    pub fn context(&self) -> RequestContext {
        RequestContext::new(self.config.credentials.tenant_name())
    }

    /// Returns a context for the configured tenant scoped to a folder.
    pub fn folder_context(&self, folder_id: u64) -> RequestContext {
        self.context().with_organization_unit(folder_id)
    }

    /// Returns the URL of an OData collection or entity path.
    pub fn endpoint_url(&self, path: &str) -> String {
        self.config.endpoint_url(path)
    }

    /// Drops the cached access token.
    pub fn invalidate_token(&self) {
        self.tokens.invalidate();
    }

    /// Returns the assets service for a folder.
    pub fn assets(&self, folder_id: u64) -> AssetsService<'_> {
        AssetsService::new(self, folder_id)
    }

    /// Returns the queue items service for a folder.
    pub fn queue_items(&self, folder_id: u64) -> QueueItemsService<'_> {
        QueueItemsService::new(self, folder_id)
    }

    /// Returns the queue definitions service for a folder.
    pub fn queue_definitions(&self, folder_id: u64) -> QueueDefinitionsService<'_> {
        QueueDefinitionsService::new(self, folder_id)
    }

    /// Returns the folders service.
    pub fn folders(&self) -> FoldersService<'_> {
        FoldersService::new(self)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }
}

impl std::fmt::Debug for OrchestratorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the Orchestrator client.
pub struct OrchestratorClientBuilder {
    config_builder: OrchestratorConfigBuilder,
    config: Option<OrchestratorConfig>,
    executor: Option<Arc<dyn HttpExecutor>>,
    cache: Option<Arc<dyn TokenCache>>,
    authenticator: Option<Arc<dyn Authenticator>>,
    fallback_policy: FallbackPolicy,
}

impl OrchestratorClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: OrchestratorConfigBuilder::new(),
            config: None,
            executor: None,
            cache: None,
            authenticator: None,
            fallback_policy: FallbackPolicy::default(),
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: OrchestratorConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::new()
        }
    }

    /// Sets the tenant OData root.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config_builder = self.config_builder.credentials(credentials);
        self
    }

    /// Overrides the client credentials token endpoint.
    pub fn identity_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.identity_url(url);
        self
    }

    /// Overrides the refresh-token endpoint.
    pub fn legacy_identity_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.legacy_identity_url(url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Accepts self-signed or otherwise invalid TLS certificates.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config_builder = self.config_builder.accept_invalid_certs(accept);
        self
    }

    /// Sets a custom HTTP executor.
    pub fn executor(mut self, executor: Arc<dyn HttpExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Sets a custom token cache.
    pub fn token_cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets a custom authenticator, replacing the OAuth grants.
    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Sets the grant fallback policy of the OAuth authenticator.
    pub fn fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback_policy = policy;
        self
    }

    /// Builds the client.
    pub fn build(self) -> OrchestratorResult<OrchestratorClient> {
        let config = match self.config {
            Some(config) => config,
            None => self.config_builder.build()?,
        };

        let executor: Arc<dyn HttpExecutor> = match self.executor {
            Some(executor) => executor,
            None => Arc::new(ReqwestExecutor::new(&config.executor_config())?),
        };
        let dispatcher = Arc::new(Dispatcher::new(executor));

        let authenticator: Arc<dyn Authenticator> = match self.authenticator {
            Some(authenticator) => authenticator,
            None => Arc::new(
                OAuthAuthenticator::new(Arc::clone(&dispatcher), config.identity_endpoints())
                    .with_policy(self.fallback_policy),
            ),
        };
        let cache: Arc<dyn TokenCache> = match self.cache {
            Some(cache) => cache,
            None => Arc::new(InMemoryTokenCache::new()),
        };

        let tokens = TokenProvider::new(config.credentials.clone(), cache, authenticator);

        Ok(OrchestratorClient {
            config,
            dispatcher,
            tokens,
        })
    }
}

impl Default for OrchestratorClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
