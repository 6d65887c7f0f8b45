//! OpenAI-compatible protocol rules.
//!
//! Covers OpenAI itself and the many vendors that clone its chat completions
//! API. Roles pass through unchanged (`user`/`assistant`/`system`).

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::{Value, json};

use crate::error::LlmError;
use crate::types::{ChatConfig, ChatMessage};

pub(crate) fn chat_url(config: &ChatConfig) -> String {
    format!(
        "{}/v1/chat/completions",
        config.base_url.trim_end_matches('/')
    )
}

pub(crate) fn auth_headers(config: &ChatConfig, headers: &mut HeaderMap) -> Result<(), LlmError> {
    let bearer = format!("Bearer {}", config.api_key.expose_secret());
    let value = HeaderValue::from_str(&bearer)
        .map_err(|e| LlmError::ConfigurationError(format!("invalid API key: {e}")))?;
    headers.insert(AUTHORIZATION, value);
    Ok(())
}

pub(crate) fn request_body(messages: &[ChatMessage], config: &ChatConfig) -> Value {
    let messages: Vec<Value> = messages
        .iter()
        .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
        .collect();

    json!({
        "model": config.model,
        "messages": messages,
        "stream": true,
    })
}

/// `choices[0].delta.content`, when present.
pub(crate) fn token_delta(payload: &Value) -> Option<&str> {
    payload.pointer("/choices/0/delta/content")?.as_str()
}
