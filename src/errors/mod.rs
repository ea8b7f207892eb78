//! Error types for the Orchestrator client.
//!
//! Every failure in the request pipeline is returned to the immediate caller
//! as an [`OrchestratorError`]. Transport failures, structured upstream errors,
//! opaque upstream errors, decode failures and authentication failures are
//! kept distinct so callers can branch on them.

mod classify;
mod request_error;

pub use classify::{classify, decode, is_success, reason_phrase, SUCCESS_STATUS_CODES};
pub use request_error::RequestError;
pub(crate) use request_error::null_as_default;

use bytes::Bytes;
use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for Orchestrator operations.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// Error type for Orchestrator client operations.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Configuration error (missing credentials, invalid URL, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// The HTTP exchange itself failed; passed through from the executor.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request body could not be serialized.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// The upstream returned a structured error payload.
    #[error("{error}")]
    Request {
        /// HTTP status code.
        status: u16,
        /// Decoded error payload.
        error: RequestError,
        /// Raw response body.
        body: Bytes,
    },

    /// The upstream failed without a payload.
    #[error("HTTP Error {status}: {reason}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Standard reason phrase for the status.
        reason: String,
        /// Raw response body (empty).
        body: Bytes,
    },

    /// A response payload was not valid JSON for the expected shape.
    #[error("Decode error: {message}")]
    Decode {
        /// Error message from the decoder.
        message: String,
        /// HTTP status code of the response, if one was received.
        status: Option<u16>,
        /// Raw response body.
        body: Bytes,
    },

    /// Authentication succeeded at the HTTP level but returned no token.
    #[error("Empty Access Token Error")]
    EmptyAccessToken,
}

impl OrchestratorError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        OrchestratorError::Configuration {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            OrchestratorError::Request { status, .. } | OrchestratorError::Http { status, .. } => {
                Some(*status)
            }
            OrchestratorError::Decode { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns the response body that accompanied the error, if any.
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            OrchestratorError::Request { body, .. }
            | OrchestratorError::Http { body, .. }
            | OrchestratorError::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns the structured upstream error, if the response carried one.
    pub fn request_error(&self) -> Option<&RequestError> {
        match self {
            OrchestratorError::Request { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns true if the upstream rejected the credentials or token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403)) || matches!(self, OrchestratorError::EmptyAccessToken)
    }
}

impl From<serde_json::Error> for OrchestratorError {
    fn from(err: serde_json::Error) -> Self {
        OrchestratorError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for OrchestratorError {
    fn from(err: url::ParseError) -> Self {
        OrchestratorError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
