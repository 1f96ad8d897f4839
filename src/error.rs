//! Unified error types for the Contentstack MCP Server.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Fixed message for requests that never produced a response.
pub const NO_RESPONSE_MESSAGE: &str = "No response received from Contentstack server. \
     Please check your network connection and Contentstack service status.";

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// API request/response errors.
///
/// Every failed operation surfaces exactly one of these. The `Display`
/// output is the normalized, human-readable message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid region: {region}. Supported regions are: {supported}")]
    InvalidRegion { region: String, supported: String },

    #[error("Missing value for path parameter '{0}'")]
    MissingPathParam(String),

    #[error("{message}")]
    Remote {
        status: StatusCode,
        message: String,
        body: Option<Value>,
    },

    /// The request could not be assembled locally (e.g. an illegal header value).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{}", NO_RESPONSE_MESSAGE)]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// A status line arrived but the body could not be read.
    #[error("Failed to read Contentstack response (HTTP {status}): {source}")]
    ResponseBody {
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to create HTTP client: {0}")]
    HttpClientInit(String),
}

impl ApiError {
    /// HTTP status of a remote failure, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Remote { status, .. } | ApiError::ResponseBody { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Decoded response body of a remote failure.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Remote { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}
