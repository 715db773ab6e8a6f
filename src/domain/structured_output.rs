//! Text-to-JSON extraction for structured model output.
//!
//! Models asked for JSON often wrap it in a markdown code fence. This module
//! removes a fence at the very start and end of the completion and parses what
//! remains. JSON embedded in surrounding prose is not searched for.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a schema the core can request and validate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaId {
    /// `{title: string, steps: string[]}`
    Plan,
    /// One of the classifier labels, as a bare string.
    ClassificationLabel,
}

impl SchemaId {
    pub const ALL: [SchemaId; 2] = [SchemaId::Plan, SchemaId::ClassificationLabel];
}

/// Removes a leading ```` ``` ```` / ```` ```json ```` line and a trailing
/// ```` ``` ````, if present. Unfenced text is returned trimmed.
///
/// A fence opened and closed on one line (```` ```json {"a":1}``` ````) is
/// also accepted.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (e.g. "json") on the opening line.
    let (body, single_line) = match after_open.find('\n') {
        Some(newline) => (&after_open[newline + 1..], false),
        None => (after_open, true),
    };

    let inner = body.trim_end().strip_suffix("```").unwrap_or(body).trim();
    if single_line {
        strip_info_word(inner)
    } else {
        inner
    }
}

/// Strips a leading info word such as `json` when it is followed by a space or
/// the start of a JSON container. A lone word (`true`, `null`) is kept.
fn strip_info_word(inner: &str) -> &str {
    if !inner.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return inner;
    }
    let end = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+'))
        .unwrap_or(inner.len());
    let rest = &inner[end..];
    if rest.starts_with(|c: char| c.is_whitespace() || c == '{' || c == '[') {
        rest.trim_start()
    } else {
        inner
    }
}

/// Strips a surrounding fence and parses the remainder as JSON.
pub fn parse_fenced_json(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(strip_code_fence(text))
}
