//! HTTP transport layer for the Orchestrator client.
//!
//! [`HttpExecutor`] is the seam between the pipeline and the network: the
//! production implementation wraps `reqwest`, tests substitute a fake that
//! returns canned responses. [`Dispatcher`] sits on top of it and owns the
//! request-shaping and response-classification rules.

mod dispatch;
mod http;
mod request;

pub use dispatch::Dispatcher;
pub use http::{
    ExecutorConfig, HttpExecutor, HttpRequest, HttpResponse, ReqwestExecutor,
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT,
};
pub use request::{OutboundRequest, RequestBody, RequestContext};

use std::fmt;
use std::time::Duration;

/// Authorization header name.
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// Content type header name.
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

/// Tenant header attached to every request.
pub const HEADER_TENANT_NAME: &str = "X-UIPATH-TenantName";

/// Folder scoping header required by most resource endpoints.
pub const HEADER_ORGANIZATION_UNIT_ID: &str = "X-UIPATH-OrganizationUnitId";

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request.
    Get,
    /// POST request.
    Post,
    /// PUT request.
    Put,
    /// DELETE request.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport error types.
///
/// These come from the executor and reach the caller unchanged.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// The request could not be built by the executor.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// The response body could not be read.
    #[error("Failed to read response body: {message}")]
    Body {
        /// Error message.
        message: String,
    },
}
