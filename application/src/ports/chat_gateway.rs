//! Chat Gateway port
//!
//! Defines the interface for talking to the chat web service. Every method
//! maps to exactly one HTTP request; implementations (adapters) live in the
//! infrastructure layer.

use async_trait::async_trait;
use claude_web_domain::{
    AppendMessageRequest, Attachment, ConversationId, ConversationSummary, DomainError,
    OrganizationId, ProtocolError,
};
use futures::stream::{BoxStream, Stream, StreamExt};
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Connection failure, timeout or non-success status.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            GatewayError::Network(_) | GatewayError::Timeout | GatewayError::Status { .. }
        )
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, GatewayError::Protocol(_))
    }

    /// Raised before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, GatewayError::Validation(_))
    }
}

/// Lazy, ordered stream of completion fragments.
///
/// Not restartable: iterating again means issuing a new request. Dropping
/// the stream closes the underlying connection. After the first error the
/// stream ends.
pub struct CompletionStream {
    inner: BoxStream<'static, Result<String, GatewayError>>,
}

impl CompletionStream {
    pub fn new(inner: BoxStream<'static, Result<String, GatewayError>>) -> Self {
        Self { inner }
    }

    /// Build a stream from already-known items (useful for tests and fakes).
    pub fn from_items(items: Vec<Result<String, GatewayError>>) -> Self {
        Self::new(futures::stream::iter(items).boxed())
    }

    /// Consume the stream and concatenate every fragment.
    ///
    /// All-or-nothing: the first error is returned and the text gathered so
    /// far is dropped.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(fragment) = self.inner.next().await {
            full_text.push_str(&fragment?);
        }
        Ok(full_text)
    }
}

impl Stream for CompletionStream {
    type Item = Result<String, GatewayError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for CompletionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionStream").finish_non_exhaustive()
    }
}

/// Gateway to the chat web service
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Discover the organization id (first entry of the organization list)
    async fn organization_id(&self) -> Result<OrganizationId, GatewayError>;

    /// Create a conversation with a locally generated id and return that id
    async fn create_conversation(
        &self,
        organization: &OrganizationId,
        name: &str,
    ) -> Result<ConversationId, GatewayError>;

    /// List every conversation of the organization
    async fn list_conversations(
        &self,
        organization: &OrganizationId,
    ) -> Result<Vec<ConversationSummary>, GatewayError>;

    /// Fetch one conversation including its message history
    async fn get_conversation(
        &self,
        organization: &OrganizationId,
        conversation: &ConversationId,
    ) -> Result<serde_json::Value, GatewayError>;

    /// Upload a PDF, CSV or plain-text file for use as an attachment
    async fn upload_document(
        &self,
        organization: &OrganizationId,
        path: &Path,
    ) -> Result<Attachment, GatewayError>;

    /// Send a message and stream the completion back
    async fn append_message(
        &self,
        request: AppendMessageRequest,
    ) -> Result<CompletionStream, GatewayError>;

    /// Ids of every conversation of the organization
    async fn list_conversation_ids(
        &self,
        organization: &OrganizationId,
    ) -> Result<Vec<ConversationId>, GatewayError> {
        let conversations = self.list_conversations(organization).await?;
        Ok(conversations.into_iter().map(|c| c.uuid).collect())
    }
}
