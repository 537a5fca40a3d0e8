//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Raised before any I/O happens, so callers can rely on a `DomainError`
/// meaning "nothing was sent over the wire".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unsupported file type for '{file_name}': {mime} (expected PDF, CSV or plain text)")]
    UnsupportedFileType { file_name: String, mime: String },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Violations of the event-stream or JSON response protocol.
///
/// `raw` carries the offending line or body (truncated) so it can be logged
/// at the point of failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Malformed JSON: {error}\nRaw line: {raw}")]
    MalformedJson { error: String, raw: String },

    #[error("Missing field '{field}'\nRaw line: {raw}")]
    MissingField { field: &'static str, raw: String },

    #[error("Stream line is not valid UTF-8")]
    InvalidUtf8,

    #[error("Organization list is empty")]
    EmptyOrganizations,
}

impl DomainError {
    /// Check if this error came from upload validation
    pub fn is_unsupported_file_type(&self) -> bool {
        matches!(self, DomainError::UnsupportedFileType { .. })
    }
}
