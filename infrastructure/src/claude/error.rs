//! Error types for the claude.ai web adapter

use claude_web_application::GatewayError;
use claude_web_domain::{DomainError, ProtocolError};
use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for web adapter operations
pub type Result<T> = std::result::Result<T, ClaudeWebError>;

/// Errors that can occur when talking to the web service
#[derive(Error, Debug)]
pub enum ClaudeWebError {
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("Unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("Failed to read upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClaudeWebError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClaudeWebError::Timeout
        } else {
            ClaudeWebError::Http(e)
        }
    }
}

impl From<ClaudeWebError> for GatewayError {
    fn from(e: ClaudeWebError) -> Self {
        match e {
            ClaudeWebError::Http(e) => GatewayError::Network(e.to_string()),
            ClaudeWebError::Timeout => GatewayError::Timeout,
            ClaudeWebError::Status { status, body } => GatewayError::Status {
                status: status.as_u16(),
                body,
            },
            ClaudeWebError::Protocol(e) => GatewayError::Protocol(e),
            ClaudeWebError::Validation(e) => GatewayError::Validation(e),
            ClaudeWebError::Io(e) => GatewayError::Io(e.to_string()),
            ClaudeWebError::Config(message) => GatewayError::Configuration(message),
        }
    }
}
