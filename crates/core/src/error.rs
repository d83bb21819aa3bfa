//! Unified error types for ddicheck.
//!
//! These cover setup and input validation. Per-drug lookup failures are data
//! (see [`crate::model::FailureReason`]) and never travel through this type.

use rmcp::model::{ErrorCode, ErrorData as McpError};

use crate::config::ConfigError;

/// Unified error types for ddicheck.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an empty drug list).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Configuration failed to load or validate.
    #[error("INVALID_CONFIG: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// A marker selector could not be compiled.
    #[error("INVALID_SELECTOR: {selector}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// The lookup URL template cannot produce a valid http(s) URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP_CLIENT: {0}")]
    HttpClient(String),
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidConfig(e) => (-32001, e.to_string()),
            Error::InvalidSelector { .. } => (-32002, err.to_string()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::HttpClient(msg) => (-32004, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
