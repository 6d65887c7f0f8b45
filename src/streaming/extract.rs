//! Per-provider token extraction from decoded stream events.

use serde_json::Value;

use crate::protocol::{anthropic, gemini, openai};
use crate::types::Provider;

/// Returns the incremental text carried by one stream event, if any.
///
/// Pure field lookup; never errors. Absent fields are routine for control
/// events (stop reasons, pings, usage updates) and resolve to `None` rather
/// than surfacing as a failure.
pub fn extract_token(provider: Provider, payload: &Value) -> Option<&str> {
    match provider {
        Provider::OpenAiCompatible => openai::token_delta(payload),
        Provider::Anthropic => anthropic::token_delta(payload),
        Provider::Google => gemini::token_delta(payload),
    }
}
