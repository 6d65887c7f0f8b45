//! Incremental SSE frame decoding.
//!
//! Network chunks arrive at arbitrary boundaries: mid-line, even mid-scalar
//! for multi-byte UTF-8. `SseLineDecoder` turns that byte sequence into
//! complete logical lines without dropping or duplicating a byte, and
//! `data_payload` classifies each completed line.

/// Literal payload marking end of stream; ignored, never an event.
pub const DONE_SENTINEL: &str = "[DONE]";

const DATA_PREFIX: &str = "data: ";

/// Stateful line splitter for one response body stream.
///
/// Holds two pieces of state, both local to a single send:
/// - a UTF-8 carry for a multi-byte scalar split across chunks
/// - the trailing not-yet-terminated line
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    carry: Vec<u8>,
    buffer: String,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one chunk and returns every line completed by it.
    ///
    /// The segment after the last line feed (possibly empty) is retained as
    /// the start of the next line.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.decode_into_buffer(chunk);

        let mut rest = std::mem::take(&mut self.buffer);
        let mut lines = Vec::new();
        while let Some(pos) = rest.find('\n') {
            let remainder = rest.split_off(pos + 1);
            rest.truncate(pos); // drop the line feed itself
            lines.push(rest);
            rest = remainder;
        }
        self.buffer = rest;
        lines
    }

    /// Ends the stream. A leftover partial line is discarded: well-formed SSE
    /// streams terminate with a blank line, so an unterminated tail is not a
    /// logical event.
    pub fn finish(self) {
        if !self.buffer.is_empty() || !self.carry.is_empty() {
            tracing::trace!(
                leftover_bytes = self.buffer.len() + self.carry.len(),
                "discarding unterminated SSE tail"
            );
        }
    }

    fn decode_into_buffer(&mut self, chunk: &[u8]) {
        let mut bytes = std::mem::take(&mut self.carry);
        bytes.extend_from_slice(chunk);

        let mut input = bytes.as_slice();
        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    break;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    self.buffer
                        .push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match err.error_len() {
                        // Genuinely invalid bytes: decode lossily and move on.
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[len..];
                        }
                        // Truncated scalar: stash it for the next chunk.
                        None => {
                            self.carry = rest.to_vec();
                            break;
                        }
                    }
                }
            }
        }
    }
}

/// Classifies one completed line, returning the JSON payload of a data frame.
///
/// Blank lines, the `[DONE]` sentinel, and lines without the `data: ` prefix
/// (comments, `event:` fields) all return `None`; none of them is an error.
pub fn data_payload(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let payload = line.strip_prefix(DATA_PREFIX)?;
    if payload == DONE_SENTINEL {
        return None;
    }
    Some(payload)
}
