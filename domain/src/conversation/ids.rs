//! Identifier value objects
//!
//! Both identifiers are opaque strings handed out by the service (or, for a
//! new conversation, generated locally as a random UUID). They end up inside
//! URL paths, so [`path_segment`](OrganizationId::path_segment) rejects values
//! that would change the shape of the request path.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account-scoped identifier required to address conversation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(String);

impl OrganizationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the id if it is usable as a single URL path segment.
    pub fn path_segment(&self) -> Result<&str, DomainError> {
        check_segment(&self.0)
    }
}

impl From<String> for OrganizationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrganizationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one chat thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random (v4) id for a conversation about to be created.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the id if it is usable as a single URL path segment.
    pub fn path_segment(&self) -> Result<&str, DomainError> {
        check_segment(&self.0)
    }
}

impl From<String> for ConversationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn check_segment(id: &str) -> Result<&str, DomainError> {
    if id.is_empty() || id.contains(['/', '?', '#']) || id.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidIdentifier(id.to_string()));
    }
    Ok(id)
}
