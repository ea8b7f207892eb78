//! Process-local access token cache.

use secrecy::SecretString;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Key under which the current access token is stored.
pub const TOKEN_CACHE_KEY: &str = "orchestrator_access_token";

/// An access token together with its advertised lifetime.
#[derive(Clone)]
pub struct CachedToken {
    /// Bearer token.
    pub access_token: SecretString,
    /// Time to live from the moment the token is stored.
    pub expires_in: Duration,
}

impl CachedToken {
    /// Creates a cached token.
    pub fn new(access_token: SecretString, expires_in: Duration) -> Self {
        Self {
            access_token,
            expires_in,
        }
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Storage for the current access token.
///
/// Implementations are internally synchronized; callers never lock them.
/// A token whose lifetime has elapsed must not be returned by [`get`](Self::get).
pub trait TokenCache: Send + Sync {
    /// Returns the cached token if it has not expired.
    fn get(&self) -> Option<CachedToken>;

    /// Stores a token, replacing any previous one.
    fn set(&self, token: CachedToken);

    /// Drops the cached token.
    fn clear(&self);
}

struct Entry {
    token: CachedToken,
    /// `None` when the lifetime does not fit in an `Instant`.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self) -> bool {
        self.expires_at
            .map_or(true, |expires_at| Instant::now() < expires_at)
    }
}

/// In-memory [`TokenCache`] with per-entry expiry.
#[derive(Default)]
pub struct InMemoryTokenCache {
    entries: Mutex<HashMap<&'static str, Entry>>,
}

impl InMemoryTokenCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<&'static str, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenCache for InMemoryTokenCache {
    fn get(&self) -> Option<CachedToken> {
        let mut entries = self.entries();
        match entries.get(TOKEN_CACHE_KEY) {
            Some(entry) if entry.is_live() => Some(entry.token.clone()),
            Some(_) => {
                entries.remove(TOKEN_CACHE_KEY);
                None
            }
            None => None,
        }
    }

    fn set(&self, token: CachedToken) {
        let expires_at = Instant::now().checked_add(token.expires_in);
        self.entries()
            .insert(TOKEN_CACHE_KEY, Entry { token, expires_at });
    }

    fn clear(&self) {
        self.entries().remove(TOKEN_CACHE_KEY);
    }
}

impl fmt::Debug for InMemoryTokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTokenCache")
            .field("entries", &self.entries().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn token(value: &str, ttl: Duration) -> CachedToken {
        CachedToken::new(SecretString::new(value.to_string()), ttl)
    }

    #[test]
    fn test_get_returns_stored_token() {
        let cache = InMemoryTokenCache::new();
        assert!(cache.get().is_none());

        cache.set(token("abc", Duration::from_secs(3600)));

        let cached = cache.get().unwrap();
        assert_eq!(cached.access_token.expose_secret(), "abc");
    }

    #[test]
    fn test_set_replaces_token() {
        let cache = InMemoryTokenCache::new();
        cache.set(token("old", Duration::from_secs(3600)));
        cache.set(token("new", Duration::from_secs(3600)));

        assert_eq!(cache.get().unwrap().access_token.expose_secret(), "new");
    }

    #[test]
    fn test_expired_token_is_evicted() {
        let cache = InMemoryTokenCache::new();
        cache.set(token("short-lived", Duration::ZERO));

        assert!(cache.get().is_none());
        assert_eq!(cache.entries().len(), 0);
    }

    #[test]
    fn test_unbounded_lifetime_does_not_expire() {
        let cache = InMemoryTokenCache::new();
        cache.set(token("long-lived", Duration::from_secs(u64::MAX)));

        let cached = cache.get().unwrap();
        assert_eq!(cached.access_token.expose_secret(), "long-lived");
        assert!(cache.entries()[TOKEN_CACHE_KEY].expires_at.is_none());
    }

    #[test]
    fn test_clear() {
        let cache = InMemoryTokenCache::new();
        cache.set(token("abc", Duration::from_secs(60)));
        cache.clear();

        assert!(cache.get().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug_str = format!("{:?}", token("super-secret", Duration::from_secs(1)));
        assert!(!debug_str.contains("super-secret"));
    }
}
