//! Credential material for the identity service.

use secrecy::SecretString;
use std::fmt;

/// Long-lived credentials of one client instance.
///
/// Holds up to two credential sets: an external application (ID, secret and
/// scopes) for the client credentials grant, and a deprecated client ID with
/// user key for the refresh-token grant. At least one must be complete.
#[derive(Clone)]
pub struct Credentials {
    pub(crate) tenant_name: String,
    pub(crate) application_id: Option<String>,
    pub(crate) application_secret: Option<SecretString>,
    pub(crate) scopes: String,
    pub(crate) client_id: Option<String>,
    pub(crate) user_key: Option<SecretString>,
}

impl Credentials {
    /// Creates credentials for a tenant, with no credential set yet.
    pub fn new(tenant_name: impl Into<String>) -> Self {
        Self {
            tenant_name: tenant_name.into(),
            application_id: None,
            application_secret: None,
            scopes: String::new(),
            client_id: None,
            user_key: None,
        }
    }

    /// Sets the external application credentials.
    pub fn application(
        mut self,
        application_id: impl Into<String>,
        application_secret: impl Into<String>,
    ) -> Self {
        self.application_id = Some(application_id.into());
        self.application_secret = Some(SecretString::new(application_secret.into()));
        self
    }

    /// Sets the space-separated scopes requested for the application.
    pub fn scopes(mut self, scopes: impl Into<String>) -> Self {
        self.scopes = scopes.into();
        self
    }

    /// Sets the deprecated client ID and user key.
    pub fn legacy(mut self, client_id: impl Into<String>, user_key: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self.user_key = Some(SecretString::new(user_key.into()));
        self
    }

    /// Returns the tenant name.
    pub fn tenant_name(&self) -> &str {
        &self.tenant_name
    }

    /// Returns the external application ID.
    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }

    /// Returns the requested scopes.
    pub fn requested_scopes(&self) -> &str {
        &self.scopes
    }

    /// Returns the deprecated client ID.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Returns true if the application credential set is complete.
    pub fn has_application(&self) -> bool {
        self.application_id.as_deref().is_some_and(|id| !id.is_empty())
            && self.application_secret.is_some()
    }

    /// Returns true if the deprecated credential set is complete.
    pub fn has_legacy(&self) -> bool {
        self.client_id.as_deref().is_some_and(|id| !id.is_empty()) && self.user_key.is_some()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_name", &self.tenant_name)
            .field("application_id", &self.application_id)
            .field(
                "application_secret",
                &self.application_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("scopes", &self.scopes)
            .field("client_id", &self.client_id)
            .field("user_key", &self.user_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_sets() {
        let credentials = Credentials::new("Tenant");
        assert!(!credentials.has_application());
        assert!(!credentials.has_legacy());

        let credentials = credentials.application("app", "secret").legacy("", "key");
        assert!(credentials.has_application());
        assert!(!credentials.has_legacy());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new("Tenant")
            .application("app-id", "app-secret-value")
            .legacy("client-id", "user-key-value");

        let debug_str = format!("{:?}", credentials);
        assert!(debug_str.contains("app-id"));
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("app-secret-value"));
        assert!(!debug_str.contains("user-key-value"));
    }
}
