//! Configuration module for the Orchestrator client.
//!
//! Provides the tenant base URL, credentials, identity endpoints and the
//! settings of the production HTTP executor.

mod credentials;

pub use credentials::Credentials;

use std::time::Duration;
use url::{Host, Url};

use crate::auth::{IdentityEndpoints, DEPRECATED_OAUTH_URL, OAUTH_URL};
use crate::errors::{OrchestratorError, OrchestratorResult};
use crate::transport::{ExecutorConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};

/// Configuration for the Orchestrator client.
#[derive(Clone)]
pub struct OrchestratorConfig {
    /// Tenant OData root, always ending with `/`
    /// (e.g. `https://cloud.uipath.com/org/tenant/orchestrator_/odata/`).
    pub base_url: String,
    /// Credentials used to obtain access tokens.
    pub credentials: Credentials,
    /// Client credentials token endpoint.
    pub identity_url: String,
    /// Refresh-token endpoint.
    pub legacy_identity_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Accept invalid TLS certificates.
    pub accept_invalid_certs: bool,
}

impl OrchestratorConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ORCHESTRATOR_BASE_URL` (required): tenant OData root
    /// - `ORCHESTRATOR_TENANT_NAME` (required): tenant logical name
    /// - `ORCHESTRATOR_APPLICATION_ID`, `ORCHESTRATOR_APPLICATION_SECRET`,
    ///   `ORCHESTRATOR_SCOPES`: external application credentials
    /// - `ORCHESTRATOR_CLIENT_ID`, `ORCHESTRATOR_USER_KEY`: deprecated
    ///   refresh-token credentials
    /// - `ORCHESTRATOR_TIMEOUT` (optional): request timeout in seconds
    pub fn from_env() -> OrchestratorResult<Self> {
        let base_url = required_env("ORCHESTRATOR_BASE_URL")?;
        let tenant_name = required_env("ORCHESTRATOR_TENANT_NAME")?;

        let mut credentials = Credentials::new(tenant_name);
        if let (Ok(id), Ok(secret)) = (
            std::env::var("ORCHESTRATOR_APPLICATION_ID"),
            std::env::var("ORCHESTRATOR_APPLICATION_SECRET"),
        ) {
            credentials = credentials.application(id, secret);
        }
        if let Ok(scopes) = std::env::var("ORCHESTRATOR_SCOPES") {
            credentials = credentials.scopes(scopes);
        }
        if let (Ok(client_id), Ok(user_key)) = (
            std::env::var("ORCHESTRATOR_CLIENT_ID"),
            std::env::var("ORCHESTRATOR_USER_KEY"),
        ) {
            credentials = credentials.legacy(client_id, user_key);
        }

        let mut builder = OrchestratorConfigBuilder::new()
            .base_url(base_url)
            .credentials(credentials);

        if let Ok(timeout_str) = std::env::var("ORCHESTRATOR_TIMEOUT") {
            if let Ok(timeout_secs) = timeout_str.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(timeout_secs));
            }
        }

        builder.build()
    }

    /// Returns the URL of an OData collection or entity path.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Returns the identity endpoints.
    pub fn identity_endpoints(&self) -> IdentityEndpoints {
        IdentityEndpoints {
            current: self.identity_url.clone(),
            legacy: self.legacy_identity_url.clone(),
        }
    }

    /// Returns the settings for the production executor.
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}

impl std::fmt::Debug for OrchestratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorConfig")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("identity_url", &self.identity_url)
            .field("legacy_identity_url", &self.legacy_identity_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

/// Builder for `OrchestratorConfig`.
#[derive(Default)]
pub struct OrchestratorConfigBuilder {
    base_url: Option<String>,
    credentials: Option<Credentials>,
    identity_url: Option<String>,
    legacy_identity_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    accept_invalid_certs: bool,
}

impl OrchestratorConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tenant OData root.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Overrides the client credentials token endpoint.
    pub fn identity_url(mut self, url: impl Into<String>) -> Self {
        self.identity_url = Some(url.into());
        self
    }

    /// Overrides the refresh-token endpoint.
    pub fn legacy_identity_url(mut self, url: impl Into<String>) -> Self {
        self.legacy_identity_url = Some(url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Accepts self-signed or otherwise invalid TLS certificates.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> OrchestratorResult<OrchestratorConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| OrchestratorError::configuration("Base URL is required"))?;
        validate_url("Base URL", &base_url)?;
        let base_url = format!("{}/", base_url.trim_end_matches('/'));

        let credentials = self
            .credentials
            .ok_or_else(|| OrchestratorError::configuration("Credentials are required"))?;
        if credentials.tenant_name().is_empty() {
            return Err(OrchestratorError::configuration("Tenant name cannot be empty"));
        }
        if !credentials.has_application() && !credentials.has_legacy() {
            return Err(OrchestratorError::configuration(
                "Either application ID and secret or client ID and user key are required",
            ));
        }

        let identity_url = self.identity_url.unwrap_or_else(|| OAUTH_URL.to_string());
        validate_url("Identity URL", &identity_url)?;
        let legacy_identity_url = self
            .legacy_identity_url
            .unwrap_or_else(|| DEPRECATED_OAUTH_URL.to_string());
        validate_url("Legacy identity URL", &legacy_identity_url)?;

        Ok(OrchestratorConfig {
            base_url,
            credentials,
            identity_url,
            legacy_identity_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            accept_invalid_certs: self.accept_invalid_certs,
        })
    }
}

/// Requires HTTPS, except for plain HTTP to a loopback host.
fn validate_url(name: &str, value: &str) -> OrchestratorResult<()> {
    let url = Url::parse(value)?;
    let loopback = match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(addr)) => addr.is_loopback(),
        Some(Host::Ipv6(addr)) => addr.is_loopback(),
        None => false,
    };

    match url.scheme() {
        "https" => Ok(()),
        "http" if loopback => Ok(()),
        _ => Err(OrchestratorError::configuration(format!(
            "{} must use HTTPS",
            name
        ))),
    }
}

fn required_env(name: &str) -> OrchestratorResult<String> {
    std::env::var(name).map_err(|_| {
        OrchestratorError::configuration(format!("{} environment variable not set", name))
    })
}
