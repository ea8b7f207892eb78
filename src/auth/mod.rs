//! Authentication for the Orchestrator client.
//!
//! Access tokens are obtained from the identity service with the client
//! credentials grant. Tenants that still run on the deprecated account
//! service are served by the refresh-token grant, which is only ever used as
//! a fallback. Tokens are cached until they expire; see [`TokenProvider`].

mod cache;
mod oauth;
mod provider;

pub use cache::{CachedToken, InMemoryTokenCache, TokenCache, TOKEN_CACHE_KEY};
pub use oauth::{IdentityEndpoints, OAuthAuthenticator, DEPRECATED_OAUTH_URL, OAUTH_URL};
pub use provider::TokenProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Credentials;
use crate::errors::{null_as_default, OrchestratorResult};

/// Token response from the identity service.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthResult {
    /// Bearer token.
    #[serde(deserialize_with = "null_as_default")]
    pub access_token: String,
    /// OpenID identity token, when issued.
    #[serde(deserialize_with = "null_as_default")]
    pub id_token: String,
    /// Granted scopes.
    #[serde(deserialize_with = "null_as_default")]
    pub scope: String,
    /// Token lifetime in seconds.
    #[serde(deserialize_with = "null_as_default")]
    pub expires_in: u64,
    /// Token type, normally `Bearer`.
    #[serde(deserialize_with = "null_as_default")]
    pub token_type: String,
}

impl fmt::Debug for AuthResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResult")
            .field("access_token", &"[REDACTED]")
            .field("id_token", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Grant protocol used to obtain a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Client credentials grant against the identity service.
    Current,
    /// Refresh-token grant against the deprecated account service.
    Legacy,
}

impl fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStrategy::Current => f.write_str("client_credentials"),
            AuthStrategy::Legacy => f.write_str("refresh_token"),
        }
    }
}

/// Which strategy to try first, and which one to fall back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Strategy tried first.
    pub primary: AuthStrategy,
    /// Strategy tried once if the primary fails.
    pub fallback: Option<AuthStrategy>,
}

impl FallbackPolicy {
    /// Uses a single strategy with no fallback.
    pub fn only(strategy: AuthStrategy) -> Self {
        Self {
            primary: strategy,
            fallback: None,
        }
    }

    /// Tries `primary`, then `fallback`.
    pub fn with_fallback(primary: AuthStrategy, fallback: AuthStrategy) -> Self {
        Self {
            primary,
            fallback: Some(fallback),
        }
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::with_fallback(AuthStrategy::Current, AuthStrategy::Legacy)
    }
}

/// Exchanges credentials for an access token.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticates and returns the token response.
    ///
    /// A returned result always carries a non-empty access token.
    async fn authenticate(&self, credentials: &Credentials) -> OrchestratorResult<AuthResult>;
}
