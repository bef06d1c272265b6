//! Error types for cinesphere
//!
//! This module provides error handling for the service, including:
//! - Domain-specific error variants (Graph, auth, archive, config)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for cinesphere operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cinesphere
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The environment key that caused the error (e.g., "GRAPH_TENANT_ID")
        key: Option<String>,
    },

    /// The token endpoint refused to issue an access token
    #[error("failed to get access token: HTTP {status}")]
    Auth {
        /// HTTP status returned by the token endpoint
        status: u16,
        /// Response body returned by the token endpoint
        message: String,
    },

    /// Microsoft Graph returned a non-success status
    #[error("Graph error {status} for {path}")]
    Graph {
        /// HTTP status returned by Graph
        status: u16,
        /// Drive path (or URL) the request was made for
        path: String,
        /// Response body returned by Graph
        message: String,
    },

    /// Requested library path is malformed or escapes the root folder
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Zip archive writer failed
    #[error("archive error: {0}")]
    Archive(#[from] async_zip::error::ZipError),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

impl Error {
    /// Build a configuration error for a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "not_found",
///     "message": "Graph error 404 for MyStreamingLibrary/Movies/Missing",
///     "details": { "upstream_status": 404, "path": "MyStreamingLibrary/Movies/Missing" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "graph_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            Error::InvalidPath(_) => 400,

            Error::Graph { status: 404, .. } => 404,

            // 502 Bad Gateway - the cloud drive misbehaved
            Error::Auth { .. } => 502,
            Error::Graph { .. } => 502,
            Error::Network(_) => 502,

            Error::Config { .. } => 500,
            Error::Io(_) => 500,
            Error::Archive(_) => 500,
            Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Auth { .. } => "auth_error",
            Error::Graph { status: 404, .. } => "not_found",
            Error::Graph { .. } => "graph_error",
            Error::InvalidPath(_) => "invalid_path",
            Error::Network(_) => "network_error",
            Error::Io(_) => "io_error",
            Error::Archive(_) => "archive_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Graph { status, path, .. } => Some(serde_json::json!({
                "upstream_status": status,
                "path": path,
            })),
            Error::Auth { status, .. } => Some(serde_json::json!({
                "upstream_status": status,
            })),
            Error::InvalidPath(path) => Some(serde_json::json!({
                "path": path,
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
