//! Google Generative Language (Gemini) protocol rules.
//!
//! Streaming is selected by the `alt=sse` query parameter on the
//! `:streamGenerateContent` endpoint; there is no `stream` flag in the body.
//! Auth is query-parameter based, so the API key is appended to the URL and
//! no auth header is sent.

use secrecy::ExposeSecret;
use serde_json::{Value, json};

use crate::protocol::AuthScheme;
use crate::types::{ChatConfig, ChatMessage, MessageRole, Provider};

const MAX_OUTPUT_TOKENS: u32 = 4096;

pub(crate) fn chat_url(config: &ChatConfig) -> String {
    let mut endpoint = format!(
        "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
        config.base_url.trim_end_matches('/'),
        config.model
    );
    if let AuthScheme::QueryParam(name) = Provider::Google.auth_scheme() {
        endpoint.push('&');
        endpoint.push_str(name);
        endpoint.push('=');
        endpoint.push_str(&urlencoding::encode(config.api_key.expose_secret()));
    }
    endpoint
}

pub(crate) fn request_body(messages: &[ChatMessage], _config: &ChatConfig) -> Value {
    // Gemini only knows "user" and "model"; system prompts ride as user turns.
    let contents: Vec<Value> = messages
        .iter()
        .map(|m| {
            let role = match m.role {
                MessageRole::Assistant => "model",
                MessageRole::User | MessageRole::System => "user",
            };
            json!({ "role": role, "parts": [{ "text": m.content }] })
        })
        .collect();

    json!({
        "contents": contents,
        "generationConfig": { "maxOutputTokens": MAX_OUTPUT_TOKENS },
    })
}

/// `candidates[0].content.parts[0].text`, when present.
pub(crate) fn token_delta(payload: &Value) -> Option<&str> {
    payload.pointer("/candidates/0/content/parts/0/text")?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ChatConfig {
        ChatConfig::new(
            Provider::Google,
            "AIza-test",
            "https://generativelanguage.googleapis.com",
            "gemini-2.0-flash",
        )
    }

    #[test]
    fn chat_url_selects_sse_and_appends_key() {
        assert_eq!(
            chat_url(&config()),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:streamGenerateContent?alt=sse&key=AIza-test"
        );
    }

    #[test]
    fn chat_url_percent_encodes_the_key() {
        let mut c = config();
        c.api_key = "a key&x".into();
        assert!(chat_url(&c).ends_with("&key=a%20key%26x"));
    }

    #[test]
    fn body_maps_roles_and_omits_stream_flag() {
        let messages = vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ];
        let body = request_body(&messages, &config());
        assert_eq!(
            body,
            json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "be brief" }] },
                    { "role": "user", "parts": [{ "text": "hi" }] },
                    { "role": "model", "parts": [{ "text": "hello" }] },
                ],
                "generationConfig": { "maxOutputTokens": 4096 },
            })
        );
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn token_delta_reads_first_candidate_part() {
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hi" }] } }]
        });
        assert_eq!(token_delta(&payload), Some("Hi"));
    }

    #[test]
    fn token_delta_absent_fields_yield_none() {
        for payload in [
            json!({}),
            json!({ "candidates": [] }),
            json!({ "candidates": [{ "content": { "parts": [] } }] }),
            json!({ "candidates": [{ "finishReason": "STOP" }] }),
        ] {
            assert_eq!(token_delta(&payload), None);
        }
    }
}
