//! Turns free-form model output into a JSON object.
//!
//! Models wrap JSON in prose or markdown fences even when told not to.
//! The first ```` ```json ```` fence holding an object wins; without a fence
//! the whole reply is parsed as-is.

use crate::error::NormalizationError;
use crate::models::ExtractedDocument;
use regex::Regex;
use std::sync::OnceLock;

pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse JSON from Gemini response";

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("fence pattern is valid")
    })
}

/// Returns the object text inside the first JSON code fence, if any.
///
/// The capture is non-greedy: it stops at the first `}` followed by a
/// closing fence, so a second fenced block is never merged in.
pub fn extract_fenced_json(text: &str) -> Option<&str> {
    fence_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn normalize_response(raw: &str) -> Result<ExtractedDocument, NormalizationError> {
    let candidate = extract_fenced_json(raw).unwrap_or(raw);

    serde_json::from_str::<ExtractedDocument>(candidate).map_err(|e| {
        log::warn!("Model response is not a JSON object: {}", e);
        NormalizationError::new(format!("{}: {}", PARSE_FAILURE_MESSAGE, e), raw)
    })
}
