//! HTTP protocol details for the claude.ai web API.
//!
//! Endpoint path templates, the fixed header set and the small request
//! bodies that are not part of the domain model.
//!
//! # Endpoints
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | `GET`  | `/api/organizations` | JSON array, first `uuid` used |
//! | `GET`  | `/api/organizations/{org}/chat_conversations` | JSON array |
//! | `POST` | `/api/organizations/{org}/chat_conversations` | JSON object |
//! | `GET`  | `/api/organizations/{org}/chat_conversations/{conv}` | JSON object |
//! | `POST` | `/api/convert_document` | JSON object (multipart upload) |
//! | `POST` | `/api/append_message` | `text/event-stream` |

use claude_web_domain::{ConversationId, DomainError, OrganizationId};
use serde::Serialize;

/// Default service root.
pub const DEFAULT_BASE_URL: &str = "https://claude.ai";

/// Desktop browser user agent the web endpoints expect.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36 Edg/114.0.1823.79";

/// `Accept` value sent on every request.
pub const EVENT_STREAM: &str = "text/event-stream";

/// `Content-Type` for every request except uploads.
pub const APPLICATION_JSON: &str = "application/json";

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FILE_FIELD: &str = "file";

/// Multipart field carrying the organization id.
pub const UPLOAD_ORG_FIELD: &str = "orgUuid";

pub fn organizations_path() -> String {
    "/api/organizations".to_string()
}

pub fn conversations_path(organization: &OrganizationId) -> Result<String, DomainError> {
    Ok(format!(
        "/api/organizations/{}/chat_conversations",
        organization.path_segment()?
    ))
}

pub fn conversation_path(
    organization: &OrganizationId,
    conversation: &ConversationId,
) -> Result<String, DomainError> {
    Ok(format!(
        "{}/{}",
        conversations_path(organization)?,
        conversation.path_segment()?
    ))
}

pub fn append_message_path() -> String {
    "/api/append_message".to_string()
}

pub fn convert_document_path() -> String {
    "/api/convert_document".to_string()
}

/// Join a base URL and an absolute path, ignoring trailing slashes on the base.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Body of the conversation-creation request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateConversationBody<'a> {
    pub uuid: &'a ConversationId,
    pub name: &'a str,
}
