//! Structured error payload returned by the Orchestrator and identity endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Error payload decoded from a non-success response.
///
/// The identity provider reports OAuth-style errors (`error`,
/// `error_description`) while the Orchestrator reports `errorCode` and
/// `message`. Both shapes decode into this one type; the populated half
/// decides how it renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestError {
    /// Orchestrator error message.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    /// OAuth error name (e.g. `invalid_scope`).
    #[serde(rename = "error", default, deserialize_with = "null_as_default")]
    pub error_name: String,
    /// Orchestrator numeric error code.
    #[serde(rename = "errorCode", default, deserialize_with = "null_as_default")]
    pub error_code: i64,
    /// OAuth error description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_description: String,
    /// Upstream trace identifier.
    #[serde(rename = "traceId", default, deserialize_with = "null_as_default")]
    pub trace_id: String,
    /// Identifiers of the resources involved in the failure.
    #[serde(rename = "resourceIds", default, deserialize_with = "null_as_default")]
    pub resource_ids: Vec<u64>,
}

impl RequestError {
    /// Returns true if this payload carries an OAuth-style error name.
    pub fn is_oauth_error(&self) -> bool {
        !self.error_name.is_empty()
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_oauth_error() {
            write!(
                f,
                "Request Failed: Error Code({}) {}",
                self.error_name, self.error_description
            )
        } else {
            write!(
                f,
                "Request Failed: Error Code({}) {}",
                self.error_code, self.message
            )
        }
    }
}

impl std::error::Error for RequestError {}

/// Deserializes an explicit `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
