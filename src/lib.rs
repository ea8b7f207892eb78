//! UiPath Orchestrator Client Library
//!
//! An async Rust client for the Orchestrator REST/OData API. Handles OAuth
//! authentication with token caching, attaches tenant and folder context to
//! every call, and turns failed responses into typed errors.
//!
//! # Features
//!
//! - **Authentication**: client credentials grant, with the deprecated
//!   refresh-token grant as a fallback
//! - **Token Caching**: one authentication per token lifetime, shared by
//!   concurrent callers
//! - **Resources**: assets, queue items, queue definitions and folders
//! - **Typed Errors**: structured upstream errors kept apart from transport
//!   and decode failures
//! - **Observability**: `tracing` spans and events with credentials redacted
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use orchestrator_client::{Credentials, OrchestratorClient, QueueItem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OrchestratorClient::builder()
//!         .base_url("https://cloud.uipath.com/acme/DefaultTenant/orchestrator_/odata/")
//!         .credentials(
//!             Credentials::new("DefaultTenant")
//!                 .application("app-id", "app-secret")
//!                 .scopes("OR.Queues"),
//!         )
//!         .build()?;
//!
//!     let item = QueueItem::new("Invoices")
//!         .with_reference("INV-001")
//!         .with_content("Amount", 125);
//!     let stored = client.queue_items(1234567).store(item).await?;
//!     println!("Queued item {}", stored.id);
//!     Ok(())
//! }
//! ```
//!
//! # Raw Requests
//!
//! Endpoints without a dedicated service go through the pipeline directly:
//!
//! ```rust,no_run
//! use orchestrator_client::{OrchestratorClient, OutboundRequest};
//!
//! # async fn run(client: &OrchestratorClient) -> Result<(), Box<dyn std::error::Error>> {
//! let request = OutboundRequest::get(client.endpoint_url("Robots")).query("$top", "10");
//! let body = client
//!     .send_with_authorization(request, &client.folder_context(1234567))
//!     .await?;
//! println!("{}", String::from_utf8_lossy(&body));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use auth::{
    AuthResult, AuthStrategy, Authenticator, CachedToken, FallbackPolicy, InMemoryTokenCache,
    OAuthAuthenticator, TokenCache, TokenProvider,
};
pub use client::{OrchestratorClient, OrchestratorClientBuilder};
pub use config::{Credentials, OrchestratorConfig, OrchestratorConfigBuilder};
pub use errors::{OrchestratorError, OrchestratorResult, RequestError};
pub use transport::{
    HttpExecutor, HttpMethod, OutboundRequest, RequestContext, ReqwestExecutor, TransportError,
};

// Type re-exports
pub use types::{
    Asset, AssetTag, AssetValueScope, AssetValueType, Folder, ODataList, ProcessingException,
    QueueDefinition, QueueItem, QueueItemCreateRequest, QueueItemPriority,
};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
