//! Stream decoding: SSE frame handling and token extraction.

mod extract;
mod sse;

pub use extract::extract_token;
pub use sse::{DONE_SENTINEL, SseLineDecoder, data_payload};
