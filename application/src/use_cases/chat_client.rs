//! Chat client use case.
//!
//! Wraps a [`ChatGateway`] with the little state a caller usually wants to
//! keep between calls:
//!
//! - the organization id, discovered once and cached
//! - a registry mapping caller-assigned slot numbers to conversation ids
//!
//! Both live on the [`ChatClient`] value; nothing is global.

use crate::ports::chat_gateway::{ChatGateway, CompletionStream, GatewayError};
use claude_web_domain::util::truncate_str;
use claude_web_domain::{
    AppendMessageRequest, Attachment, CompletionOptions, ConversationId, OrganizationId,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info};

/// Errors that can occur in [`ChatClient`] operations.
#[derive(Error, Debug)]
pub enum ChatClientError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("No conversation registered for slot {0}")]
    UnknownConversation(u64),
}

/// Chat session over a [`ChatGateway`]: cached organization plus a slot registry.
pub struct ChatClient {
    gateway: Arc<dyn ChatGateway>,
    options: CompletionOptions,
    organization: OnceCell<OrganizationId>,
    conversations: RwLock<HashMap<u64, ConversationId>>,
}

impl ChatClient {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            gateway,
            options: CompletionOptions::default(),
            organization: OnceCell::new(),
            conversations: RwLock::new(HashMap::new()),
        }
    }

    /// Use these completion options for every message sent.
    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    /// Skip discovery and use a known organization id.
    pub fn with_organization(self, organization: OrganizationId) -> Self {
        Self {
            organization: OnceCell::new_with(Some(organization)),
            ..self
        }
    }

    pub fn options(&self) -> &CompletionOptions {
        &self.options
    }

    pub fn gateway(&self) -> &Arc<dyn ChatGateway> {
        &self.gateway
    }

    /// Organization id, discovered on first use.
    pub async fn organization_id(&self) -> Result<OrganizationId, ChatClientError> {
        let organization = self
            .organization
            .get_or_try_init(|| async {
                let id = self.gateway.organization_id().await?;
                info!("Discovered organization {}", id);
                Ok::<_, GatewayError>(id)
            })
            .await?;
        Ok(organization.clone())
    }

    /// Conversation registered under `slot`, if any.
    pub async fn conversation(&self, slot: u64) -> Option<ConversationId> {
        self.conversations.read().await.get(&slot).cloned()
    }

    /// Register (or replace) the conversation for `slot`.
    pub async fn register(&self, slot: u64, conversation: ConversationId) -> Option<ConversationId> {
        debug!("Registering conversation {} at slot {}", conversation, slot);
        self.conversations.write().await.insert(slot, conversation)
    }

    /// Remove the conversation registered for `slot`.
    pub async fn forget(&self, slot: u64) -> Option<ConversationId> {
        self.conversations.write().await.remove(&slot)
    }

    /// Return the conversation for `slot`, creating one remotely if the slot
    /// is empty.
    pub async fn open_conversation(
        &self,
        slot: u64,
        name: &str,
    ) -> Result<ConversationId, ChatClientError> {
        if let Some(existing) = self.conversation(slot).await {
            return Ok(existing);
        }

        let organization = self.organization_id().await?;
        let created = self
            .gateway
            .create_conversation(&organization, name)
            .await?;

        // The registry is not locked across the request; first writer wins.
        let mut conversations = self.conversations.write().await;
        let registered = conversations.entry(slot).or_insert_with(|| created.clone());
        if *registered == created {
            info!("Opened conversation {} at slot {}", created, slot);
        } else {
            debug!(
                "Slot {} was filled concurrently, keeping {} over {}",
                slot, registered, created
            );
        }
        Ok(registered.clone())
    }

    /// Send `message` to the conversation at `slot` and stream the reply.
    pub async fn ask(&self, slot: u64, message: &str) -> Result<CompletionStream, ChatClientError> {
        self.ask_with_attachments(slot, message, Vec::new()).await
    }

    /// Like [`ask`](Self::ask), with converted documents attached.
    pub async fn ask_with_attachments(
        &self,
        slot: u64,
        message: &str,
        attachments: Vec<Attachment>,
    ) -> Result<CompletionStream, ChatClientError> {
        let conversation = self
            .conversation(slot)
            .await
            .ok_or(ChatClientError::UnknownConversation(slot))?;
        let organization = self.organization_id().await?;

        debug!(
            "Asking conversation {} ({} attachments): {}",
            conversation,
            attachments.len(),
            truncate_str(message, 100)
        );

        let request =
            AppendMessageRequest::with_options(organization, conversation, message, &self.options)
                .with_attachments(attachments);
        Ok(self.gateway.append_message(request).await?)
    }

    /// Send `message` and wait for the whole reply.
    pub async fn ask_collect(&self, slot: u64, message: &str) -> Result<String, ChatClientError> {
        let stream = self.ask(slot, message).await?;
        let text = stream.collect_text().await?;
        debug!("Collected reply for slot {} ({} bytes)", slot, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use claude_web_domain::{ChatModel, ConversationSummary, ProtocolError};
    use std::path::Path;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    // ==================== Test Mocks ====================

    #[derive(Default)]
    struct MockGateway {
        org_calls: AtomicUsize,
        created: AtomicUsize,
        fragments: Vec<Result<String, &'static str>>,
        sent: Mutex<Vec<AppendMessageRequest>>,
        create_started: Notify,
        release_create: Option<Arc<Notify>>,
    }

    impl MockGateway {
        fn with_fragments(fragments: Vec<Result<String, &'static str>>) -> Self {
            Self {
                fragments,
                ..Default::default()
            }
        }

        /// Creation blocks until `release` is notified.
        fn with_held_create(release: Arc<Notify>) -> Self {
            Self {
                fragments: vec![Ok("x".to_string())],
                release_create: Some(release),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ChatGateway for MockGateway {
        async fn organization_id(&self) -> Result<OrganizationId, GatewayError> {
            self.org_calls.fetch_add(1, Ordering::SeqCst);
            Ok(OrganizationId::new("org-1"))
        }

        async fn create_conversation(
            &self,
            _organization: &OrganizationId,
            _name: &str,
        ) -> Result<ConversationId, GatewayError> {
            self.create_started.notify_one();
            if let Some(release) = &self.release_create {
                release.notified().await;
            }
            let n = self.created.fetch_add(1, Ordering::SeqCst);
            Ok(ConversationId::new(format!("conv-{n}")))
        }

        async fn list_conversations(
            &self,
            _organization: &OrganizationId,
        ) -> Result<Vec<ConversationSummary>, GatewayError> {
            Ok(vec![ConversationSummary {
                uuid: ConversationId::new("listed"),
                name: None,
                extra: Default::default(),
            }])
        }

        async fn get_conversation(
            &self,
            _organization: &OrganizationId,
            conversation: &ConversationId,
        ) -> Result<serde_json::Value, GatewayError> {
            Ok(serde_json::json!({ "uuid": conversation.as_str() }))
        }

        async fn upload_document(
            &self,
            _organization: &OrganizationId,
            _path: &Path,
        ) -> Result<Attachment, GatewayError> {
            Err(GatewayError::Configuration("not used".to_string()))
        }

        async fn append_message(
            &self,
            request: AppendMessageRequest,
        ) -> Result<CompletionStream, GatewayError> {
            self.sent.lock().unwrap().push(request);
            let items = self
                .fragments
                .iter()
                .map(|f| match f {
                    Ok(text) => Ok(text.clone()),
                    Err(_) => Err(GatewayError::Protocol(ProtocolError::InvalidUtf8)),
                })
                .collect();
            Ok(CompletionStream::from_items(items))
        }
    }

    #[tokio::test]
    async fn organization_is_discovered_once() {
        let gateway = Arc::new(MockGateway::default());
        let client = ChatClient::new(gateway.clone());

        assert_eq!(client.organization_id().await.unwrap().as_str(), "org-1");
        assert_eq!(client.organization_id().await.unwrap().as_str(), "org-1");
        assert_eq!(gateway.org_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn known_organization_skips_discovery() {
        let gateway = Arc::new(MockGateway::default());
        let client = ChatClient::new(gateway.clone()).with_organization("org-9".into());

        assert_eq!(client.organization_id().await.unwrap().as_str(), "org-9");
        assert_eq!(gateway.org_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn open_conversation_reuses_slot() {
        let gateway = Arc::new(MockGateway::default());
        let client = ChatClient::new(gateway.clone());

        let first = client.open_conversation(1, "a").await.unwrap();
        let again = client.open_conversation(1, "a").await.unwrap();
        let other = client.open_conversation(2, "b").await.unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(gateway.created.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn register_and_forget() {
        let client = ChatClient::new(Arc::new(MockGateway::default()));

        assert!(client.register(7, "listed".into()).await.is_none());
        assert_eq!(client.conversation(7).await.unwrap().as_str(), "listed");
        assert_eq!(client.forget(7).await.unwrap().as_str(), "listed");
        assert!(client.conversation(7).await.is_none());
    }

    #[tokio::test]
    async fn ask_unknown_slot_fails_without_request() {
        let gateway = Arc::new(MockGateway::default());
        let client = ChatClient::new(gateway.clone());

        let err = client.ask(3, "hi").await.unwrap_err();
        assert!(matches!(err, ChatClientError::UnknownConversation(3)));
        assert!(gateway.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ask_collect_concatenates_fragments() {
        let gateway = Arc::new(MockGateway::with_fragments(vec![
            Ok("Hel".to_string()),
            Ok("lo".to_string()),
        ]));
        let client = ChatClient::new(gateway.clone()).with_options(CompletionOptions {
            model: ChatModel::ClaudeInstant1,
            timezone: "UTC".to_string(),
        });
        client.register(1, "conv-x".into()).await;

        assert_eq!(client.ask_collect(1, "hello").await.unwrap(), "Hello");

        let sent = gateway.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].conversation_uuid.as_str(), "conv-x");
        assert_eq!(sent[0].organization_uuid.as_str(), "org-1");
        assert_eq!(sent[0].completion.model, ChatModel::ClaudeInstant1);
        assert_eq!(sent[0].completion.timezone, "UTC");
        assert_eq!(sent[0].text, "hello");
    }

    #[tokio::test]
    async fn ask_collect_propagates_stream_error() {
        let gateway = Arc::new(MockGateway::with_fragments(vec![
            Ok("partial".to_string()),
            Err("boom"),
        ]));
        let client = ChatClient::new(gateway);
        client.register(1, "conv-x".into()).await;

        let err = client.ask_collect(1, "hello").await.unwrap_err();
        assert!(matches!(
            err,
            ChatClientError::Gateway(GatewayError::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn ask_with_attachments_forwards_them() {
        let gateway = Arc::new(MockGateway::default());
        let client = ChatClient::new(gateway.clone());
        client.register(1, "conv-x".into()).await;

        let attachment: Attachment = serde_json::from_value(serde_json::json!({
            "file_name": "a.txt",
            "file_type": "text/plain",
            "file_size": 1,
            "extracted_content": "a"
        }))
        .unwrap();
        client
            .ask_with_attachments(1, "read this", vec![attachment])
            .await
            .unwrap();

        assert_eq!(gateway.sent.lock().unwrap()[0].attachments.len(), 1);
    }

    #[tokio::test]
    async fn list_conversation_ids_default_method() {
        let gateway = MockGateway::default();
        let ids = gateway
            .list_conversation_ids(&OrganizationId::new("org-1"))
            .await
            .unwrap();
        assert_eq!(ids, vec![ConversationId::new("listed")]);
    }

    #[tokio::test]
    async fn other_slots_stay_usable_while_a_conversation_is_created() {
        let release = Arc::new(Notify::new());
        let gateway = Arc::new(MockGateway::with_held_create(release.clone()));
        let client = Arc::new(ChatClient::new(gateway.clone()));
        client.register(2, "conv-ready".into()).await;

        let opening = tokio::spawn({
            let client = client.clone();
            async move { client.open_conversation(1, "slow").await }
        });
        gateway.create_started.notified().await;

        let reply = tokio::time::timeout(Duration::from_secs(1), client.ask_collect(2, "hi"))
            .await
            .expect("slot 2 blocked by creation on slot 1")
            .unwrap();
        assert_eq!(reply, "x");
        assert!(client.conversation(1).await.is_none());

        release.notify_one();
        let opened = opening.await.unwrap().unwrap();
        assert_eq!(opened.as_str(), "conv-0");
        assert_eq!(client.conversation(1).await, Some(opened));
    }

    #[tokio::test]
    async fn concurrent_registration_wins_over_late_creation() {
        let release = Arc::new(Notify::new());
        let gateway = Arc::new(MockGateway::with_held_create(release.clone()));
        let client = Arc::new(ChatClient::new(gateway.clone()));

        let opening = tokio::spawn({
            let client = client.clone();
            async move { client.open_conversation(1, "slow").await }
        });
        gateway.create_started.notified().await;

        client.register(1, "conv-first".into()).await;
        release.notify_one();

        let opened = opening.await.unwrap().unwrap();
        assert_eq!(opened.as_str(), "conv-first");
        assert_eq!(client.conversation(1).await.unwrap().as_str(), "conv-first");
    }
}
