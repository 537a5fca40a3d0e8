//! Conversation domain.
//!
//! - [`ids::OrganizationId`] / [`ids::ConversationId`]: opaque identifiers
//! - [`entities::ConversationSummary`]: one entry of the conversation listing
//! - [`entities::Attachment`]: a converted document ready to attach

pub mod entities;
pub mod ids;

/// Name given to conversations created without an explicit one.
pub const DEFAULT_CONVERSATION_NAME: &str = "AI assistant discussion";
