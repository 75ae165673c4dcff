//! Error types for the Appdock library.
//!
//! This module defines the error taxonomy shared by the registry and the
//! RPC surface: validation failures (caught before any filesystem effect),
//! I/O failures (abort the current operation), and descriptor problems
//! (tolerated during enumeration and cleanup, surfaced otherwise).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Appdock operations.
#[derive(Debug, Error)]
pub enum AppdockError {
    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid params: {message}")]
    InvalidParams { message: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // Descriptor errors
    #[error("Descriptor error at {path:?}: {message}")]
    Descriptor { path: PathBuf, message: String },

    // Network errors (icon prefetch)
    #[error("Network error: {message}")]
    Network {
        message: String,
        cause: Option<String>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Appdock operations.
pub type Result<T> = std::result::Result<T, AppdockError>;

impl From<std::io::Error> for AppdockError {
    fn from(err: std::io::Error) -> Self {
        AppdockError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for AppdockError {
    fn from(err: reqwest::Error) -> Self {
        AppdockError::Network {
            message: err.to_string(),
            cause: err.url().map(|u| u.to_string()),
        }
    }
}

impl AppdockError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        AppdockError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Convert to a JSON-RPC error code.
    ///
    /// Standard JSON-RPC error codes:
    /// - -32602: Invalid params
    /// - -32603: Internal error
    ///
    /// Custom error codes (application-defined, -32000 to -32099):
    /// - -32000: Network/connectivity error
    /// - -32003: Operation failed (install/update/delete I/O)
    /// - -32005: Validation error
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            AppdockError::Network { .. } => -32000,

            AppdockError::Io { .. }
            | AppdockError::FileNotFound(_)
            | AppdockError::Descriptor { .. } => -32003,

            AppdockError::Validation { .. } => -32005,

            AppdockError::InvalidParams { .. } => -32602,

            // All other errors are internal errors
            _ => -32603,
        }
    }
}
