//! Chat model value object

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Models accepted by the `append_message` endpoint (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ChatModel {
    #[default]
    Claude2,
    ClaudeInstant1,
    Custom(String),
}

impl ChatModel {
    /// Get the string identifier sent on the wire
    pub fn as_str(&self) -> &str {
        match self {
            ChatModel::Claude2 => "claude-2",
            ChatModel::ClaudeInstant1 => "claude-instant-1",
            ChatModel::Custom(s) => s,
        }
    }

    /// Check if this is one of the built-in models
    pub fn is_known(&self) -> bool {
        !matches!(self, ChatModel::Custom(_))
    }
}

impl std::fmt::Display for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ChatModel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "claude-2" => ChatModel::Claude2,
            "claude-instant-1" => ChatModel::ClaudeInstant1,
            other => ChatModel::Custom(other.to_string()),
        })
    }
}

impl Serialize for ChatModel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChatModel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<ChatModel>();
        Ok(model)
    }
}
