//! Cached access token provider.

use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, trace};

use super::{Authenticator, CachedToken, TokenCache};
use crate::config::Credentials;
use crate::errors::{OrchestratorError, OrchestratorResult};

/// Hands out access tokens, authenticating only when the cache is empty.
///
/// Concurrent callers that miss the cache at the same time wait on a single
/// authentication instead of each running their own.
pub struct TokenProvider {
    credentials: Credentials,
    cache: Arc<dyn TokenCache>,
    authenticator: Arc<dyn Authenticator>,
    refresh_guard: Mutex<()>,
}

impl TokenProvider {
    /// Creates a token provider.
    pub fn new(
        credentials: Credentials,
        cache: Arc<dyn TokenCache>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            credentials,
            cache,
            authenticator,
            refresh_guard: Mutex::new(()),
        }
    }

    /// Returns a valid access token.
    #[instrument(name = "orchestrator.access_token", skip(self))]
    pub async fn access_token(&self) -> OrchestratorResult<SecretString> {
        if let Some(token) = self.cache.get() {
            trace!("Using cached access token");
            return Ok(token.access_token);
        }

        let _guard = self.refresh_guard.lock().await;

        // Another caller may have refreshed while we waited.
        if let Some(token) = self.cache.get() {
            trace!("Access token refreshed by a concurrent caller");
            return Ok(token.access_token);
        }

        debug!("Access token cache miss, authenticating");
        let result = self.authenticator.authenticate(&self.credentials).await?;
        if result.access_token.is_empty() {
            return Err(OrchestratorError::EmptyAccessToken);
        }

        let access_token = SecretString::new(result.access_token);
        self.cache.set(CachedToken::new(
            access_token.clone(),
            Duration::from_secs(result.expires_in),
        ));

        Ok(access_token)
    }

    /// Drops the cached token so the next call authenticates again.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    /// Returns the credentials tokens are issued for.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
