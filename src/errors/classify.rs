//! Response classification.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use super::{OrchestratorError, OrchestratorResult, RequestError};

/// Status codes treated as success by the Orchestrator API.
pub const SUCCESS_STATUS_CODES: [u16; 3] = [200, 201, 204];

/// Returns true if `status` is in [`SUCCESS_STATUS_CODES`].
pub fn is_success(status: u16) -> bool {
    SUCCESS_STATUS_CODES.contains(&status)
}

/// Standard reason phrase for a status code, or an empty string when the
/// code has none.
pub fn reason_phrase(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}

/// Turns a non-success response into an error.
///
/// An empty body yields [`OrchestratorError::Http`] built from the status
/// line. Anything else must decode as a [`RequestError`]; a body that does
/// not is reported as [`OrchestratorError::Decode`].
pub fn classify(status: u16, body: Bytes) -> OrchestratorError {
    if body.is_empty() {
        return OrchestratorError::Http {
            status,
            reason: reason_phrase(status).to_string(),
            body,
        };
    }

    match serde_json::from_slice::<RequestError>(&body) {
        Ok(error) => OrchestratorError::Request {
            status,
            error,
            body,
        },
        Err(e) => OrchestratorError::Decode {
            message: e.to_string(),
            status: Some(status),
            body,
        },
    }
}

/// Decodes a success payload.
pub fn decode<T: DeserializeOwned>(body: &Bytes) -> OrchestratorResult<T> {
    serde_json::from_slice(body).map_err(|e| OrchestratorError::Decode {
        message: e.to_string(),
        status: None,
        body: body.clone(),
    })
}
