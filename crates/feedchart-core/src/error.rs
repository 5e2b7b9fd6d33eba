//! Error types for feedchart operations.
//!
//! [`FeedChartError`] covers every failure the dashboard can observe. Feed
//! errors (decode failures, dropped connections) are recovered locally by the
//! listener and only ever surface as log lines and status counters; the
//! configuration and terminal variants are the ones that can stop startup.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`FeedChartError`].
pub type Result<T> = std::result::Result<T, FeedChartError>;

/// Error type for all feedchart operations.
#[derive(Debug, Error)]
pub enum FeedChartError {
    // =========================================================================
    // Feed Errors
    // =========================================================================
    /// Inbound frame could not be decoded into a record
    #[error("Failed to decode frame: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Opening the feed connection failed
    #[error("Connection to {endpoint} failed: {message}")]
    Connection { endpoint: String, message: String },

    /// The feed connection was closed by the transport or the peer
    #[error("Connection to {endpoint} closed: {reason}")]
    ConnectionClosed { endpoint: String, reason: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration file not found
    #[error("Configuration not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file is invalid YAML
    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error with context
    #[error("I/O error {operation}: {path}")]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // TUI Errors
    // =========================================================================
    /// Terminal initialization failed
    #[error("Terminal initialization failed: {message}")]
    TerminalInit { message: String },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (bug in feedchart)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl FeedChartError {
    // =========================================================================
    // Constructor helpers for common error patterns
    // =========================================================================

    /// Create a decode error from a JSON parse failure
    pub fn decode_json(source: serde_json::Error) -> Self {
        Self::Decode {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a decode error with a plain message
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection error
    pub fn connection(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a connection closed error
    pub fn connection_closed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConnectionClosed {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigNotFound error with source
    pub fn config_not_found_with_source(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigNotFound {
            path: path.into(),
            source: Some(source),
        }
    }

    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Error classification helpers
    // =========================================================================

    /// Returns true if this error is fatal (should exit application)
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TerminalInit { .. } | Self::Internal { .. })
    }

    /// Returns true if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ConfigInvalid { .. } | Self::ConfigValidation { .. }
        )
    }

    /// Returns actionable guidance for the user
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound { .. } => {
                Some("Check the --config path, or omit it to use built-in defaults")
            }
            Self::ConfigInvalid { .. } => Some("Check YAML syntax in the configuration file"),
            Self::ConfigValidation { .. } => {
                Some("Fix the reported field in ~/.feedchart/config.yaml or on the command line")
            }
            Self::Connection { .. } => Some("Check that the data source is powered and reachable"),
            Self::TerminalInit { .. } => Some("Try running with --headless"),
            _ => None,
        }
    }
}
