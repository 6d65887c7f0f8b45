//! Error types for the streaming chat client.
//!
//! Every failure of a send funnels into exactly one `LlmError` delivered via
//! the terminal callback (or a single `Err` item on the token stream); nothing
//! in this crate panics or propagates past the call boundary.

use thiserror::Error;

/// Unified error type for chat requests and streams.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure: DNS, connection, timeout, TLS.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success HTTP status from the provider, with the best error message
    /// that could be recovered from the response body.
    #[error("API error {code}: {message}")]
    ApiError {
        /// HTTP status code
        code: u16,
        /// Human-readable message (structured field, raw body, or status line)
        message: String,
        /// Parsed response body, when it was valid JSON
        details: Option<serde_json::Value>,
    },

    /// Malformed JSON where a whole payload was required (not a single
    /// stream frame; those are skipped silently).
    #[error("JSON parse error: {0}")]
    ParseError(String),

    /// The response body stream failed mid-read.
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Invalid or unusable configuration (e.g. an API key that cannot be
    /// encoded into a header value).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The caller aborted the in-flight request via its `StreamHandle`.
    #[error("Request cancelled")]
    Cancelled,
}

impl LlmError {
    /// Creates an API error without structured details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// The HTTP status code, when this error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_code_and_message() {
        let err = LlmError::api_error(429, "rate limited");
        assert_eq!(err.to_string(), "API error 429: rate limited");
        assert_eq!(err.status_code(), Some(429));
    }

    #[test]
    fn non_api_errors_have_no_status_code() {
        assert_eq!(LlmError::Cancelled.status_code(), None);
        assert_eq!(LlmError::StreamError("x".into()).status_code(), None);
    }
}
