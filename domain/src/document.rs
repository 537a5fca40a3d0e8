//! Upload validation
//!
//! `convert_document` only accepts PDF, CSV and plain text. The MIME type is
//! guessed from the file name's extension; anything outside the allow-list
//! is rejected before a request is built.

use crate::core::error::DomainError;
use std::path::Path;

/// Document types accepted by the conversion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Csv,
    PlainText,
}

impl DocumentKind {
    /// MIME type sent on the multipart part.
    pub fn mime(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Csv => "text/csv",
            DocumentKind::PlainText => "text/plain",
        }
    }

    /// Map an exact MIME essence (`type/subtype`, no parameters) to a kind.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(DocumentKind::Pdf),
            "text/csv" => Some(DocumentKind::Csv),
            "text/plain" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    /// Guess the kind from a file name, failing with
    /// [`DomainError::UnsupportedFileType`] when the guess is not allowed.
    pub fn guess(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        Self::from_mime(mime.essence_str()).ok_or_else(|| DomainError::UnsupportedFileType {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            mime: mime.essence_str().to_string(),
        })
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mime())
    }
}
