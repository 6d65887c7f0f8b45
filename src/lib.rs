//! dataweaver-chat
//!
//! Streaming chat client core for the DataWeaver console. This crate covers
//! the protocol-facing pieces only:
//! - Provider protocol adapters (endpoint, headers, request body)
//! - Incremental SSE frame decoding across arbitrary chunk boundaries
//! - Per-provider token extraction from stream events
//! - `<think>` reasoning-block splitting for display
//! - Streaming session orchestration with callback or stream delivery
//!
//! Conversation storage, rendering, and retry policy live with the caller.
#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod protocol;
pub mod streaming;
pub mod think;
pub mod types;

pub use client::{ChatClient, ChatStream, StreamCallbacks, StreamHandle};
pub use error::LlmError;
pub use think::{ParsedContent, parse_think_tags};
pub use types::{ChatConfig, ChatMessage, MessageRole, Provider, SystemMessageHandling};
