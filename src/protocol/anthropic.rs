//! Anthropic Messages API protocol rules.
//!
//! Behavior:
//! - Auth via the `x-api-key` header, never `Authorization`
//! - Fixed `anthropic-version` and browser-access headers on every request
//! - `max_tokens` is mandatory on the Messages API, pinned at 4096
//! - `system`-role handling is governed by `SystemMessageHandling`: the
//!   default keeps system messages inside the message list (the historical
//!   client behavior, which Anthropic does not formally accept); opting into
//!   `TopLevelField` lifts their content into the `system` field.

use reqwest::header::HeaderMap;
use secrecy::ExposeSecret;
use serde_json::{Value, json};

use crate::error::LlmError;
use crate::protocol::insert_header;
use crate::types::{ChatConfig, ChatMessage, MessageRole, SystemMessageHandling};

pub(crate) const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

pub(crate) fn chat_url(config: &ChatConfig) -> String {
    format!("{}/v1/messages", config.base_url.trim_end_matches('/'))
}

pub(crate) fn auth_headers(config: &ChatConfig, headers: &mut HeaderMap) -> Result<(), LlmError> {
    insert_header(headers, "x-api-key", config.api_key.expose_secret())?;
    insert_header(headers, "anthropic-version", ANTHROPIC_VERSION)?;
    insert_header(headers, "anthropic-dangerous-direct-browser-access", "true")?;
    Ok(())
}

pub(crate) fn request_body(messages: &[ChatMessage], config: &ChatConfig) -> Value {
    let mut system_parts: Vec<&str> = Vec::new();
    let listed: Vec<&ChatMessage> = match config.system_handling {
        SystemMessageHandling::InMessageList => messages.iter().collect(),
        SystemMessageHandling::TopLevelField => messages
            .iter()
            .filter(|m| {
                if m.role == MessageRole::System {
                    system_parts.push(&m.content);
                    false
                } else {
                    true
                }
            })
            .collect(),
    };

    let messages: Vec<Value> = listed
        .iter()
        .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
        .collect();

    let mut body = json!({
        "model": config.model,
        "max_tokens": MAX_TOKENS,
        "messages": messages,
        "stream": true,
    });
    if !system_parts.is_empty() {
        body["system"] = Value::String(system_parts.join("\n\n"));
    }
    body
}

/// `delta.text`, but only on `content_block_delta` events. Everything else
/// (message_start, ping, message_delta with stop reasons) carries no text.
pub(crate) fn token_delta(payload: &Value) -> Option<&str> {
    if payload.get("type")?.as_str()? != "content_block_delta" {
        return None;
    }
    payload.pointer("/delta/text")?.as_str()
}
