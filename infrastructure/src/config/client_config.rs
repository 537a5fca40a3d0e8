//! Client configuration (`claude-web.toml` / `CLAUDE_WEB_*`)

use crate::claude::protocol::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use claude_web_domain::{ChatModel, CompletionOptions, DEFAULT_TIMEZONE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default total request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Everything needed to build a [`ClaudeWebGateway`](crate::ClaudeWebGateway).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service root (default: `https://claude.ai`).
    pub base_url: String,
    /// Value of the `Cookie` header. Required.
    pub session_key: Option<String>,
    /// Outbound proxy applied to every scheme.
    pub proxy: Option<String>,
    /// Total per-request timeout covering connect and the full body.
    pub timeout_secs: u64,
    /// `User-Agent` header.
    pub user_agent: String,
    /// Model sent with every message.
    pub model: ChatModel,
    /// Timezone sent with every message.
    pub timezone: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_key: None,
            proxy: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            model: ChatModel::default(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

// Hand-written so the session cookie never ends up in logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("session_key", &self.session_key.as_ref().map(|_| "<redacted>"))
            .field("proxy", &self.proxy)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("model", &self.model)
            .field("timezone", &self.timezone)
            .finish()
    }
}

/// A problem found by [`ClientConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ClientConfig {
    pub fn new(session_key: impl Into<String>) -> Self {
        Self {
            session_key: Some(session_key.into()),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            model: self.model.clone(),
            timezone: self.timezone.clone(),
        }
    }

    /// Validate the configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        match self.session_key.as_deref().map(str::trim) {
            None | Some("") => issues.push(ConfigIssue {
                field: "session_key",
                message: "a session cookie is required".to_string(),
            }),
            _ => {}
        }

        if let Err(e) = reqwest::Url::parse(&self.base_url) {
            issues.push(ConfigIssue {
                field: "base_url",
                message: format!("'{}' is not a valid URL: {}", self.base_url, e),
            });
        }

        if let Some(proxy) = &self.proxy
            && let Err(e) = reqwest::Proxy::all(proxy.as_str())
        {
            issues.push(ConfigIssue {
                field: "proxy",
                message: format!("'{}' is not a valid proxy: {}", proxy, e),
            });
        }

        if self.timeout_secs == 0 {
            issues.push(ConfigIssue {
                field: "timeout_secs",
                message: "must be greater than zero".to_string(),
            });
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://claude.ai");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.model, ChatModel::Claude2);
        assert_eq!(config.timezone, "America/Los_Angeles");
        assert!(config.session_key.is_none());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
session_key = "sessionKey=sk-ant-abc"
timeout_secs = 30
model = "claude-instant-1"
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session_key.as_deref(), Some("sessionKey=sk-ant-abc"));
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.model, ChatModel::ClaudeInstant1);
        // Defaults should apply
        assert_eq!(config.base_url, "https://claude.ai");
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = ClientConfig::new("sessionKey=abc").with_proxy("http://127.0.0.1:7890");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            session_key: Some("  ".to_string()),
            timeout_secs: 0,
            ..Default::default()
        };
        let fields: Vec<_> = config.validate().iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["session_key", "base_url", "timeout_secs"]);
    }

    #[test]
    fn test_debug_redacts_session_key() {
        let rendered = format!("{:?}", ClientConfig::new("sessionKey=secret"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_completion_options_follow_config() {
        let config = ClientConfig {
            timezone: "Asia/Tokyo".to_string(),
            ..Default::default()
        };
        let options = config.completion_options();
        assert_eq!(options.timezone, "Asia/Tokyo");
        assert_eq!(options.model, ChatModel::Claude2);
    }
}
