//! Error types for the Scanwatch SDK.

use crate::problem::ApiProblem;
use thiserror::Error;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// The server answered with a non-success status
    ///
    /// `problem` is set when the body was a structured problem document.
    #[error("API error (HTTP {status}): {body}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
        /// Parsed problem, if the response carried one
        problem: Option<ApiProblem>,
    },

    /// Connection error (network, DNS, timeout, etc.)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Build tool has no attributes or cache performance endpoint
    #[error("Unsupported build tool: {0}")]
    UnsupportedTool(String),

    /// Client configuration or credential error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SdkError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured problem of an API error, if one was parsed
    pub fn problem(&self) -> Option<&ApiProblem> {
        match self {
            SdkError::ApiError { problem, .. } => problem.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SdkError::InvalidResponse(e.to_string())
        } else if e.is_timeout() {
            SdkError::ConnectionError(format!("Request timeout: {}", e))
        } else if e.is_builder() {
            SdkError::ConfigError(e.to_string())
        } else {
            SdkError::ConnectionError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}
