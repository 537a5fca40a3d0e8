//! `append_message` request payload

use crate::conversation::entities::Attachment;
use crate::conversation::ids::{ConversationId, OrganizationId};
use crate::core::model::ChatModel;
use serde::{Deserialize, Serialize};

/// Timezone reported to the service unless configured otherwise.
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Per-message completion settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub model: ChatModel,
    pub timezone: String,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: ChatModel::default(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

/// The `completion` object nested in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionParams {
    pub prompt: String,
    pub timezone: String,
    pub model: ChatModel,
}

/// Body of `POST /api/append_message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppendMessageRequest {
    pub completion: CompletionParams,
    pub organization_uuid: OrganizationId,
    pub conversation_uuid: ConversationId,
    pub text: String,
    pub attachments: Vec<Attachment>,
}

impl AppendMessageRequest {
    /// Build a request with default [`CompletionOptions`] and no attachments.
    pub fn new(
        organization: OrganizationId,
        conversation: ConversationId,
        message: impl Into<String>,
    ) -> Self {
        Self::with_options(
            organization,
            conversation,
            message,
            &CompletionOptions::default(),
        )
    }

    pub fn with_options(
        organization: OrganizationId,
        conversation: ConversationId,
        message: impl Into<String>,
        options: &CompletionOptions,
    ) -> Self {
        let message = message.into();
        Self {
            completion: CompletionParams {
                prompt: message.clone(),
                timezone: options.timezone.clone(),
                model: options.model.clone(),
            },
            organization_uuid: organization,
            conversation_uuid: conversation,
            text: message,
            attachments: Vec::new(),
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }
}
