//! Observability for the Orchestrator client.

mod logging;

pub use logging::{
    log_request, log_response, redact_headers, LogFormat, LogLevel, LoggingConfig,
};
