//! Error types for meterscan
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Per-record timestamp parse failures are deliberately absent: those are
//! recovered locally inside the extraction walk (the record is skipped)
//! and never surface as an `Error`.

use thiserror::Error;

/// The main error type for meterscan
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// A configuration value could not be used
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A specific config field failed validation
    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    /// Config YAML could not be parsed
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON could not be parsed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A base URL failed to parse
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Filesystem error while loading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Operation Errors
    // ============================================================================
    /// The service answered with a non-success HTTP status.
    #[error("Transport error (HTTP {status}): {message}")]
    Transport { status: u16, message: String },

    /// The response envelope was missing the expected structure.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Network, decode, or any other failure during a fetch.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Any other failure during fetch or processing
    #[error("Unexpected error: {message}")]
    Unexpected { message: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Free-form error, usually produced by [`ResultExt::context`]
    #[error("{0}")]
    Other(String),

    /// Wrapped error from an anyhow-using caller
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a transport error from a status code and response body
    pub fn transport(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// The original HTTP status code, when the service reported one.
    ///
    /// `MalformedResponse` and `Unexpected` are status-code-agnostic and
    /// return `None`.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Transport { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for meterscan
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
