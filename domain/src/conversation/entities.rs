//! Response entities
//!
//! The service's JSON shapes are only partially known, so every entity keeps
//! the fields it does not model in `extra` and serializes them back unchanged.

use super::ids::{ConversationId, OrganizationId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One element of `GET /api/organizations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub uuid: OrganizationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One element of the conversation listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub uuid: ConversationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A converted document, as returned by `POST /api/convert_document`.
///
/// Passed back verbatim in the `attachments` array of an appended message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub extracted_content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
