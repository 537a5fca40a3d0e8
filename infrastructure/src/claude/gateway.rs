//! claude.ai web gateway implementation

use crate::claude::error::{ClaudeWebError, Result};
use crate::claude::protocol::{
    self, APPLICATION_JSON, CreateConversationBody, EVENT_STREAM, UPLOAD_FILE_FIELD,
    UPLOAD_ORG_FIELD,
};
use crate::claude::stream::read_completion;
use crate::config::ClientConfig;
use async_trait::async_trait;
use claude_web_application::{ChatGateway, CompletionStream, GatewayError};
use claude_web_domain::util::truncate_str;
use claude_web_domain::{
    AppendMessageRequest, Attachment, ConversationId, ConversationSummary, DocumentKind,
    Organization, OrganizationId, ProtocolError,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Proxy, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, error, info};

/// Bytes of an error body kept in errors and logs.
const MAX_ERROR_BODY: usize = 1024;

/// Gateway talking to the claude.ai web endpoints with a session cookie
///
/// Every call opens its own connection: idle pooling is disabled so nothing
/// is shared between requests apart from the immutable configuration.
pub struct ClaudeWebGateway {
    client: Client,
    base_url: String,
}

impl ClaudeWebGateway {
    /// Build a gateway from configuration
    ///
    /// Fails when the session key is missing, or when the session key,
    /// user agent or proxy cannot be used as given.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let session_key = config
            .session_key
            .as_deref()
            .ok_or_else(|| ClaudeWebError::Config("session_key is not set".to_string()))?;

        let mut cookie = HeaderValue::from_str(session_key)
            .map_err(|e| ClaudeWebError::Config(format!("session_key: {}", e)))?;
        cookie.set_sensitive(true);
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ClaudeWebError::Config(format!("user_agent: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie);
        headers.insert(ACCEPT, HeaderValue::from_static(EVENT_STREAM));
        headers.insert(USER_AGENT, user_agent);

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .pool_max_idle_per_host(0);

        if let Some(proxy) = &config.proxy {
            let proxy = Proxy::all(proxy.as_str())
                .map_err(|e| ClaudeWebError::Config(format!("proxy '{}': {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| ClaudeWebError::Config(format!("HTTP client: {}", e)))?;

        info!(
            "ClaudeWebGateway initialized (base_url: {}, proxy: {})",
            config.base_url,
            config.proxy.as_deref().unwrap_or("none")
        );

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        protocol::join_url(&self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .header(CONTENT_TYPE, APPLICATION_JSON)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    /// Send a request and reject non-success statuses.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            let e = ClaudeWebError::from(e);
            error!("{} failed: {}", what, e);
            e
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let body = truncate_str(&body, MAX_ERROR_BODY).to_string();
        error!("{} returned {}: {}", what, status, body);
        Err(ClaudeWebError::Status { status, body })
    }

    /// Read the whole body and parse it as JSON.
    async fn json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        let body = response.bytes().await.map_err(|e| {
            let e = ClaudeWebError::from(e);
            error!("{} body could not be read: {}", what, e);
            e
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            let raw = String::from_utf8_lossy(&body);
            let error = ProtocolError::MalformedJson {
                error: e.to_string(),
                raw: truncate_str(&raw, MAX_ERROR_BODY).to_string(),
            };
            error!("{} returned an unexpected body: {}", what, error);
            error.into()
        })
    }

    /// Discover the organization id (first element of the organization list).
    pub async fn fetch_organization_id(&self) -> Result<OrganizationId> {
        let response = self
            .send(self.get(&protocol::organizations_path()), "organizations")
            .await?;
        // Only the first entry is interpreted; later ones may have any shape.
        let organizations: Vec<serde_json::Value> = Self::json(response, "organizations").await?;

        let first = organizations.into_iter().next().ok_or_else(|| {
            error!("organizations returned an empty list");
            ClaudeWebError::from(ProtocolError::EmptyOrganizations)
        })?;
        let organization = Organization::deserialize(&first).map_err(|_| {
            let error = ProtocolError::MissingField {
                field: "uuid",
                raw: truncate_str(&first.to_string(), MAX_ERROR_BODY).to_string(),
            };
            error!("organizations returned an unusable first entry: {}", error);
            ClaudeWebError::from(error)
        })?;
        debug!(
            "Using organization {} ({:?})",
            organization.uuid, organization.name
        );
        Ok(organization.uuid)
    }

    /// Create a conversation under a freshly generated id.
    pub async fn create_conversation_named(
        &self,
        organization: &OrganizationId,
        name: &str,
    ) -> Result<ConversationId> {
        let path = protocol::conversations_path(organization)?;
        let uuid = ConversationId::generate();
        let body = CreateConversationBody { uuid: &uuid, name };

        let response = self
            .send(
                self.post(&path)
                    .header(CONTENT_TYPE, APPLICATION_JSON)
                    .json(&body),
                "create conversation",
            )
            .await?;
        let created: serde_json::Value = Self::json(response, "create conversation").await?;
        debug!("Created conversation {}: {}", uuid, created);

        Ok(uuid)
    }

    pub async fn fetch_conversations(
        &self,
        organization: &OrganizationId,
    ) -> Result<Vec<ConversationSummary>> {
        let path = protocol::conversations_path(organization)?;
        let response = self.send(self.get(&path), "list conversations").await?;
        let conversations: Vec<ConversationSummary> =
            Self::json(response, "list conversations").await?;
        debug!("Listed {} conversations", conversations.len());
        Ok(conversations)
    }

    pub async fn fetch_conversation(
        &self,
        organization: &OrganizationId,
        conversation: &ConversationId,
    ) -> Result<serde_json::Value> {
        let path = protocol::conversation_path(organization, conversation)?;
        let response = self.send(self.get(&path), "get conversation").await?;
        Self::json(response, "get conversation").await
    }

    /// Upload a document for conversion.
    ///
    /// The file type is checked from the path before the file is read or any
    /// request is made.
    pub async fn upload(&self, organization: &OrganizationId, path: &Path) -> Result<Attachment> {
        let kind = DocumentKind::guess(path).inspect_err(|e| {
            error!("Upload rejected: {}", e);
        })?;

        let data = tokio::fs::read(path).await.map_err(|e| {
            error!("Failed to read {}: {}", path.display(), e);
            ClaudeWebError::from(e)
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(
            "Uploading {} ({} bytes, {})",
            file_name,
            data.len(),
            kind.mime()
        );

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(kind.mime())?;
        let form = Form::new()
            .part(UPLOAD_FILE_FIELD, part)
            .text(UPLOAD_ORG_FIELD, organization.as_str().to_string());

        let response = self
            .send(
                self.post(&protocol::convert_document_path()).multipart(form),
                "upload document",
            )
            .await?;
        Self::json(response, "upload document").await
    }

    /// Send a message and return the completion stream.
    ///
    /// The stream owns the connection; the request timeout still bounds the
    /// whole exchange including the streamed body.
    pub async fn send_message(&self, request: &AppendMessageRequest) -> Result<CompletionStream> {
        // Ids travel in the body; reject malformed ones before sending.
        request.organization_uuid.path_segment()?;
        request.conversation_uuid.path_segment()?;

        debug!(
            "Appending message to {} (model: {}, {} attachments)",
            request.conversation_uuid,
            request.completion.model,
            request.attachments.len()
        );

        let response = self
            .send(
                self.post(&protocol::append_message_path())
                    .header(CONTENT_TYPE, APPLICATION_JSON)
                    .json(request),
                "append message",
            )
            .await?;
        Ok(read_completion(response))
    }
}

#[async_trait]
impl ChatGateway for ClaudeWebGateway {
    async fn organization_id(&self) -> std::result::Result<OrganizationId, GatewayError> {
        Ok(self.fetch_organization_id().await?)
    }

    async fn create_conversation(
        &self,
        organization: &OrganizationId,
        name: &str,
    ) -> std::result::Result<ConversationId, GatewayError> {
        Ok(self.create_conversation_named(organization, name).await?)
    }

    async fn list_conversations(
        &self,
        organization: &OrganizationId,
    ) -> std::result::Result<Vec<ConversationSummary>, GatewayError> {
        Ok(self.fetch_conversations(organization).await?)
    }

    async fn get_conversation(
        &self,
        organization: &OrganizationId,
        conversation: &ConversationId,
    ) -> std::result::Result<serde_json::Value, GatewayError> {
        Ok(self.fetch_conversation(organization, conversation).await?)
    }

    async fn upload_document(
        &self,
        organization: &OrganizationId,
        path: &Path,
    ) -> std::result::Result<Attachment, GatewayError> {
        Ok(self.upload(organization, path).await?)
    }

    async fn append_message(
        &self,
        request: AppendMessageRequest,
    ) -> std::result::Result<CompletionStream, GatewayError> {
        Ok(self.send_message(&request).await?)
    }
}
