//! Extraction of the JSON payload from model output text.
//!
//! Models often wrap JSON in a markdown code fence. This step removes one
//! surrounding fence (with or without a language tag) and then demands a
//! JSON object. There is no best-effort recovery: anything else fails with
//! `InvalidResponseFormat` carrying the raw text.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use biosearch_shared::{BiosearchError, Result, Summary};

/// A whole-text fenced block: opening ``` with optional language tag, body, closing ```.
static FENCED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)\s*```\z").expect("valid fence regex")
});

/// Strip an optional code fence and parse the remainder as a JSON object.
pub fn extract_json_payload(text: &str) -> Result<Map<String, Value>> {
    let trimmed = text.trim();

    let body = if trimmed.starts_with("```") {
        FENCED
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| BiosearchError::invalid_response(text))?
    } else {
        trimmed
    };

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(BiosearchError::invalid_response(text)),
    }
}

/// Parse model text into a [`Summary`].
///
/// Missing keys become `None`; loosely typed values are kept (see [`Summary`]).
pub fn parse_summary(text: &str) -> Result<Summary> {
    let object = extract_json_payload(text)?;
    serde_json::from_value(Value::Object(object)).map_err(|_| BiosearchError::invalid_response(text))
}
