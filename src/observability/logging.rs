//! Logging configuration and utilities.
//!
//! The client emits `tracing` events and spans; installing a subscriber is
//! left to the application. [`LoggingConfig::init`] is a convenience for
//! binaries and tests that have no subscriber of their own.

use std::collections::HashMap;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::transport::{HttpMethod, HEADER_AUTHORIZATION};

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl From<LogLevel> for tracing::level_filters::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::level_filters::LevelFilter::TRACE,
            LogLevel::Debug => tracing::level_filters::LevelFilter::DEBUG,
            LogLevel::Info => tracing::level_filters::LevelFilter::INFO,
            LogLevel::Warn => tracing::level_filters::LevelFilter::WARN,
            LogLevel::Error => tracing::level_filters::LevelFilter::ERROR,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
    /// Single-line compact output.
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Installs a global subscriber.
    ///
    /// `RUST_LOG` directives are honored on top of the configured level.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed.
    pub fn init(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = EnvFilter::from_default_env().add_directive(
            tracing::level_filters::LevelFilter::from(self.level).into(),
        );

        match self.format {
            LogFormat::Pretty => tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true))
                .try_init()?,
            LogFormat::Json => tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .try_init()?,
            LogFormat::Compact => tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact())
                .try_init()?,
        }

        Ok(())
    }
}

/// Returns the headers with credential values masked.
pub fn redact_headers(headers: &HashMap<String, String>) -> Vec<(String, String)> {
    let mut redacted: Vec<(String, String)> = headers
        .iter()
        .map(|(name, value)| {
            let value = if name.eq_ignore_ascii_case(HEADER_AUTHORIZATION) {
                match value.split_once(' ') {
                    Some((scheme, _)) => format!("{} ***", scheme),
                    None => "***".to_string(),
                }
            } else {
                value.clone()
            };
            (name.clone(), value)
        })
        .collect();
    redacted.sort();
    redacted
}

/// Logs an outgoing request at debug level.
pub fn log_request(method: HttpMethod, url: &str, headers: &HashMap<String, String>) {
    tracing::debug!(
        method = %method,
        url = url,
        headers = ?redact_headers(headers),
        "Outgoing request"
    );
}

/// Logs a received response at debug level.
pub fn log_response(status: u16, elapsed: Duration, body_len: usize) {
    tracing::debug!(
        status = status,
        elapsed_ms = elapsed.as_millis() as u64,
        body_len = body_len,
        "Response received"
    );
}
