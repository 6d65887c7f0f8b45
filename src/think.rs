//! Reasoning-block splitting.
//!
//! Some models interleave a scratchpad between `<think>` and `</think>`
//! markers directly in the streamed text. The splitter separates that
//! reasoning from the answer for display, and must produce a stable partial
//! result while the text is still growing (an unterminated `<think>` is
//! normal mid-stream).
//!
//! This is derived presentation state: it is recomputed from the full
//! accumulated text on every update and keeps no state between calls.

use serde::Serialize;

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

/// Split view of a message's accumulated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedContent {
    /// Reasoning text, or `None` when the content carries no markers.
    pub think_content: Option<String>,
    /// Everything outside the reasoning block(s).
    pub main_content: String,
    /// `false` only while an unterminated `<think>` is still streaming.
    pub is_thinking_complete: bool,
}

/// Splits accumulated content into reasoning and main segments.
///
/// - One or more complete `<think>…</think>` pairs: their interiors (trimmed,
///   joined by a blank line) become the reasoning; the pairs are removed and
///   the remainder trimmed. A later unterminated opener is left embedded in
///   the main content in this case — complete pairs take precedence.
/// - A single unterminated opener: everything after it is reasoning (still
///   growing), everything before it is the main content.
/// - No markers: the content is returned verbatim, untrimmed.
pub fn parse_think_tags(content: &str) -> ParsedContent {
    let mut think_parts: Vec<&str> = Vec::new();
    let mut main = String::new();

    let mut rest = content;
    while let Some(open) = rest.find(THINK_OPEN) {
        let after_open = &rest[open + THINK_OPEN.len()..];
        let Some(close) = after_open.find(THINK_CLOSE) else {
            break;
        };
        think_parts.push(after_open[..close].trim());
        main.push_str(&rest[..open]);
        rest = &after_open[close + THINK_CLOSE.len()..];
    }

    if !think_parts.is_empty() {
        main.push_str(rest);
        return ParsedContent {
            think_content: Some(think_parts.join("\n\n")),
            main_content: main.trim().to_string(),
            is_thinking_complete: true,
        };
    }

    if let Some(open) = content.find(THINK_OPEN) {
        let reasoning = &content[open + THINK_OPEN.len()..];
        return ParsedContent {
            think_content: Some(reasoning.trim().to_string()),
            main_content: content[..open].trim().to_string(),
            is_thinking_complete: false,
        };
    }

    ParsedContent {
        think_content: None,
        main_content: content.to_string(),
        is_thinking_complete: true,
    }
}
