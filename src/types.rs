//! Core data model: providers, messages, and per-send configuration.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Supported LLM providers.
///
/// A closed set: the provider determines every protocol decision (endpoint,
/// auth scheme, body shape, token field path) and is always supplied by
/// configuration, never inferred from a URL or response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    /// OpenAI and API-compatible vendors (`/v1/chat/completions`)
    OpenAiCompatible,
    /// Anthropic Messages API
    Anthropic,
    /// Google Generative Language API (Gemini)
    Google,
}

impl Provider {
    /// Stable identifier used in logs and error messages.
    pub fn id(&self) -> &'static str {
        match self {
            Self::OpenAiCompatible => "openai-compatible",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
        }
    }
}

/// Message role within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// A single message in a conversation.
///
/// Ordering is significant: the sequence sent to the provider is the full
/// conversation history with the new user message appended, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Persisted id; empty for an outgoing message not yet stored.
    #[serde(default)]
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a message with a fresh id and current timestamp.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }
}

/// How the Anthropic adapter treats `system`-role messages.
///
/// The original client left system messages inside the message list, which
/// the Anthropic API does not formally accept (it expects a top-level
/// `system` field). That behavior is preserved as the default rather than
/// silently fixed; callers who want API-compliant requests opt in to
/// `TopLevelField`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemMessageHandling {
    /// Pass system messages through in the `messages` array unmodified.
    #[default]
    InMessageList,
    /// Lift system message content into the top-level `system` field,
    /// removing those messages from the array.
    TopLevelField,
}

/// Provider-agnostic configuration for one send.
///
/// Immutable for the duration of a call; a fresh config is supplied per send.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub provider: Provider,
    /// Opaque secret; only exposed while building auth headers or the
    /// query-parameter key.
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    /// Anthropic-only knob; ignored by the other adapters.
    pub system_handling: SystemMessageHandling,
}

impl ChatConfig {
    pub fn new(
        provider: Provider,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            api_key: SecretString::from(api_key.into()),
            base_url: base_url.into(),
            model: model.into(),
            system_handling: SystemMessageHandling::default(),
        }
    }

    pub fn with_system_handling(mut self, handling: SystemMessageHandling) -> Self {
        self.system_handling = handling;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors_assign_id_and_role() {
        let msg = ChatMessage::user("hello");
        assert!(!msg.id.is_empty());
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "hello");
    }

    #[test]
    fn config_debug_redacts_api_key() {
        let config = ChatConfig::new(
            Provider::Anthropic,
            "sk-super-secret",
            "https://api.anthropic.com",
            "claude-sonnet-4-20250514",
        );
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-super-secret"));
    }

    #[test]
    fn provider_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Provider::OpenAiCompatible).unwrap();
        assert_eq!(json, "\"open-ai-compatible\"");
        let back: Provider = serde_json::from_str("\"anthropic\"").unwrap();
        assert_eq!(back, Provider::Anthropic);
    }
}
