//! Streaming chat session orchestration.
//!
//! One send is one task: build the provider request, issue it, feed the body
//! through the SSE decoder, extract tokens, deliver them. Two delivery
//! surfaces exist over the same read loop:
//! - [`ChatClient::chat_stream`]: a pull-based token stream (cancels on drop)
//! - [`ChatClient::send`]: the callback contract, with an abort handle
//!
//! Per call, `on_token` fires zero or more times, then exactly one of
//! `on_complete`/`on_error`. No state is shared across calls.

use std::pin::Pin;

use futures::Stream;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::error::LlmError;
use crate::protocol;
use crate::streaming::{self, SseLineDecoder};
use crate::types::{ChatConfig, ChatMessage};

/// Token stream for one chat request. Dropping it aborts the underlying
/// connection and unwinds the read loop.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// Caller-supplied callbacks for one send.
pub struct StreamCallbacks {
    pub on_token: Box<dyn FnMut(&str) + Send>,
    pub on_complete: Box<dyn FnOnce() + Send>,
    pub on_error: Box<dyn FnOnce(LlmError) + Send>,
}

impl StreamCallbacks {
    pub fn new(
        on_token: impl FnMut(&str) + Send + 'static,
        on_complete: impl FnOnce() + Send + 'static,
        on_error: impl FnOnce(LlmError) + Send + 'static,
    ) -> Self {
        Self {
            on_token: Box::new(on_token),
            on_complete: Box::new(on_complete),
            on_error: Box::new(on_error),
        }
    }
}

/// Abort handle for an in-flight [`ChatClient::send`].
///
/// Dropping the handle does not cancel the stream; call [`StreamHandle::abort`].
#[derive(Debug, Clone)]
pub struct StreamHandle {
    token: CancellationToken,
}

impl StreamHandle {
    /// Terminates the in-flight stream. The send's `on_error` fires once with
    /// [`LlmError::Cancelled`] (unless a terminal callback already fired).
    pub fn abort(&self) {
        self.token.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Streaming chat client, generic over providers via [`ChatConfig`].
///
/// Holds only the shared HTTP client; safe to clone and to use from multiple
/// concurrent sends, each of which owns an independent connection and decoder.
#[derive(Debug, Clone, Default)]
pub struct ChatClient {
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a caller-configured `reqwest::Client` (proxies, timeouts, test
    /// transports).
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Issues a streaming chat request and returns the token stream.
    ///
    /// The stream yields each non-empty text token as it arrives, then ends.
    /// On failure it yields a single `Err` and ends; transport errors,
    /// non-success statuses, and mid-stream aborts all surface this way.
    /// Malformed JSON in a single data frame is skipped, not surfaced: one
    /// lost delta costs fractional text, aborting would cost the response.
    pub fn chat_stream(&self, messages: Vec<ChatMessage>, config: ChatConfig) -> ChatStream {
        let http = self.http.clone();
        let out = async_stream::stream! {
            let url = protocol::chat_url(&config);
            let headers = match protocol::request_headers(&config) {
                Ok(headers) => headers,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            let body = protocol::request_body(&messages, &config);

            tracing::debug!(
                provider = config.provider.id(),
                model = %config.model,
                message_count = messages.len(),
                "sending streaming chat request"
            );

            let response = match http.post(&url).headers(headers).json(&body).send().await {
                Ok(response) => response,
                Err(e) => {
                    yield Err(e.into());
                    return;
                }
            };

            if !response.status().is_success() {
                yield Err(read_api_error(response).await);
                return;
            }

            let mut bytes = response.bytes_stream();
            let mut decoder = SseLineDecoder::new();
            let mut token_count = 0usize;

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(LlmError::StreamError(e.to_string()));
                        return;
                    }
                };

                for line in decoder.feed(&chunk) {
                    let Some(payload) = streaming::data_payload(&line) else {
                        continue;
                    };
                    let event: serde_json::Value = match serde_json::from_str(payload) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(error = %e, "skipping malformed SSE data frame");
                            continue;
                        }
                    };
                    if let Some(token) = streaming::extract_token(config.provider, &event) {
                        if !token.is_empty() {
                            token_count += 1;
                            yield Ok(token.to_string());
                        }
                    }
                }
            }

            decoder.finish();
            tracing::debug!(token_count, "chat stream completed");
        };
        Box::pin(out)
    }

    /// Sends a conversation and delivers results through `callbacks`.
    ///
    /// The read loop runs on a spawned task; the returned [`StreamHandle`]
    /// can abort it. `on_token` is invoked for each token in order, strictly
    /// before the single terminal `on_complete` or `on_error`.
    ///
    /// Must be called within a tokio runtime.
    pub fn send(
        &self,
        messages: Vec<ChatMessage>,
        config: ChatConfig,
        callbacks: StreamCallbacks,
    ) -> StreamHandle {
        let token = CancellationToken::new();
        let handle = StreamHandle {
            token: token.clone(),
        };
        let stream = self.chat_stream(messages, config);
        tokio::spawn(drive_stream(stream, callbacks, token));
        handle
    }
}

async fn drive_stream(
    mut stream: ChatStream,
    mut callbacks: StreamCallbacks,
    cancel: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("chat stream aborted by caller");
                (callbacks.on_error)(LlmError::Cancelled);
                return;
            }
            next = stream.next() => next,
        };
        match next {
            Some(Ok(token)) => (callbacks.on_token)(&token),
            Some(Err(e)) => {
                (callbacks.on_error)(e);
                return;
            }
            None => {
                (callbacks.on_complete)();
                return;
            }
        }
    }
}

/// Recovers the most useful error message from a non-success response.
///
/// Falls through three levels: a structured field (`error.message`, then
/// `message`), the raw body text, and finally the status line.
async fn read_api_error(response: reqwest::Response) -> LlmError {
    let status = response.status();
    let status_line = format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("unknown status")
    );
    let body = response.text().await.unwrap_or_default();
    let details: Option<serde_json::Value> = serde_json::from_str(&body).ok();

    let message = details
        .as_ref()
        .and_then(|v| v.pointer("/error/message").or_else(|| v.pointer("/message")))
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status_line
            } else {
                body.clone()
            }
        });

    LlmError::ApiError {
        code: status.as_u16(),
        message,
        details,
    }
}
