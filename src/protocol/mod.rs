//! Provider protocol adapters.
//!
//! Each provider's rules live in its own module; this front dispatches on the
//! `Provider` tag. Small pure functions per operation, no trait objects: the
//! three-way divergence (endpoint, headers, body shape) stays colocated per
//! provider and independently testable.

pub(crate) mod anthropic;
pub(crate) mod gemini;
pub(crate) mod openai;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::error::LlmError;
use crate::types::{ChatConfig, ChatMessage, Provider};

/// How a provider expects its API key to be transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer {key}`
    Bearer,
    /// A provider-specific header carrying the raw key.
    CustomHeader(&'static str),
    /// The key rides as a URL query parameter; no auth header at all.
    QueryParam(&'static str),
}

impl Provider {
    pub fn auth_scheme(&self) -> AuthScheme {
        match self {
            Self::OpenAiCompatible => AuthScheme::Bearer,
            Self::Anthropic => AuthScheme::CustomHeader("x-api-key"),
            Self::Google => AuthScheme::QueryParam("key"),
        }
    }
}

/// Builds the streaming chat endpoint for the configured provider.
pub fn chat_url(config: &ChatConfig) -> String {
    match config.provider {
        Provider::OpenAiCompatible => openai::chat_url(config),
        Provider::Anthropic => anthropic::chat_url(config),
        Provider::Google => gemini::chat_url(config),
    }
}

/// Builds the full request header set: `Content-Type: application/json` plus
/// exactly one auth mechanism (or none, for query-param schemes).
pub fn request_headers(config: &ChatConfig) -> Result<HeaderMap, LlmError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    match config.provider {
        Provider::OpenAiCompatible => openai::auth_headers(config, &mut headers)?,
        Provider::Anthropic => anthropic::auth_headers(config, &mut headers)?,
        Provider::Google => {} // key travels in the URL
    }
    Ok(headers)
}

/// Encodes the conversation into the provider's request body schema.
pub fn request_body(messages: &[ChatMessage], config: &ChatConfig) -> serde_json::Value {
    match config.provider {
        Provider::OpenAiCompatible => openai::request_body(messages, config),
        Provider::Anthropic => anthropic::request_body(messages, config),
        Provider::Google => gemini::request_body(messages, config),
    }
}

pub(crate) fn insert_header(
    headers: &mut HeaderMap,
    name: &'static str,
    value: &str,
) -> Result<(), LlmError> {
    let value = HeaderValue::from_str(value).map_err(|e| {
        LlmError::ConfigurationError(format!("invalid value for header `{name}`: {e}"))
    })?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_scheme_per_provider() {
        assert_eq!(Provider::OpenAiCompatible.auth_scheme(), AuthScheme::Bearer);
        assert_eq!(
            Provider::Anthropic.auth_scheme(),
            AuthScheme::CustomHeader("x-api-key")
        );
        assert_eq!(Provider::Google.auth_scheme(), AuthScheme::QueryParam("key"));
    }

    #[test]
    fn content_type_always_present() {
        for provider in [
            Provider::OpenAiCompatible,
            Provider::Anthropic,
            Provider::Google,
        ] {
            let config = ChatConfig::new(provider, "k", "https://example.invalid", "m");
            let headers = request_headers(&config).unwrap();
            assert_eq!(
                headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
                Some("application/json"),
                "provider {}",
                provider.id()
            );
        }
    }

    #[test]
    fn google_request_has_no_auth_header() {
        let config = ChatConfig::new(Provider::Google, "k", "https://example.invalid", "m");
        let headers = request_headers(&config).unwrap();
        assert_eq!(headers.len(), 1, "only Content-Type expected");
    }
}
