//! Request-construction alignment tests: for a fixed conversation and config,
//! the endpoint, header set, and body must match each provider's documented
//! schema exactly.

use dataweaver_chat::protocol::{chat_url, request_body, request_headers};
use dataweaver_chat::{ChatConfig, ChatMessage, Provider, SystemMessageHandling};
use serde_json::json;

fn conversation() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a data assistant."),
        ChatMessage::user("List my sources"),
        ChatMessage::assistant("You have two sources."),
        ChatMessage::user("Describe the first"),
    ]
}

#[test]
fn openai_request_shape() {
    let config = ChatConfig::new(
        Provider::OpenAiCompatible,
        "sk-test",
        "https://api.openai.com",
        "gpt-4o-mini",
    );

    assert_eq!(
        chat_url(&config),
        "https://api.openai.com/v1/chat/completions"
    );

    let headers = request_headers(&config).unwrap();
    assert_eq!(
        headers.get("authorization").and_then(|v| v.to_str().ok()),
        Some("Bearer sk-test")
    );

    assert_eq!(
        request_body(&conversation(), &config),
        json!({
            "model": "gpt-4o-mini",
            "messages": [
                { "role": "system", "content": "You are a data assistant." },
                { "role": "user", "content": "List my sources" },
                { "role": "assistant", "content": "You have two sources." },
                { "role": "user", "content": "Describe the first" },
            ],
            "stream": true,
        })
    );
}

#[test]
fn anthropic_request_shape() {
    let config = ChatConfig::new(
        Provider::Anthropic,
        "sk-ant-test",
        "https://api.anthropic.com",
        "claude-sonnet-4-20250514",
    );

    assert_eq!(chat_url(&config), "https://api.anthropic.com/v1/messages");

    let headers = request_headers(&config).unwrap();
    assert_eq!(
        headers.get("x-api-key").and_then(|v| v.to_str().ok()),
        Some("sk-ant-test")
    );
    assert_eq!(
        headers
            .get("anthropic-version")
            .and_then(|v| v.to_str().ok()),
        Some("2023-06-01")
    );
    assert_eq!(
        headers
            .get("anthropic-dangerous-direct-browser-access")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
    assert!(headers.get("authorization").is_none());

    // Default: system messages stay in the list (historical behavior).
    let body = request_body(&conversation(), &config);
    assert_eq!(body["max_tokens"], json!(4096));
    assert_eq!(body["stream"], json!(true));
    assert_eq!(body["messages"][0]["role"], json!("system"));
    assert!(body.get("system").is_none());

    // Opt-in: system content lifted to the top-level field.
    let config = config.with_system_handling(SystemMessageHandling::TopLevelField);
    let body = request_body(&conversation(), &config);
    assert_eq!(body["system"], json!("You are a data assistant."));
    assert_eq!(body["messages"][0]["role"], json!("user"));
}

#[test]
fn google_request_shape() {
    let config = ChatConfig::new(
        Provider::Google,
        "g-key",
        "https://generativelanguage.googleapis.com",
        "gemini-2.0-flash",
    );

    assert_eq!(
        chat_url(&config),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:streamGenerateContent?alt=sse&key=g-key"
    );

    let headers = request_headers(&config).unwrap();
    assert_eq!(headers.len(), 1, "Content-Type only; auth rides in the URL");

    assert_eq!(
        request_body(&conversation(), &config),
        json!({
            "contents": [
                { "role": "user", "parts": [{ "text": "You are a data assistant." }] },
                { "role": "user", "parts": [{ "text": "List my sources" }] },
                { "role": "model", "parts": [{ "text": "You have two sources." }] },
                { "role": "user", "parts": [{ "text": "Describe the first" }] },
            ],
            "generationConfig": { "maxOutputTokens": 4096 },
        })
    );
}
