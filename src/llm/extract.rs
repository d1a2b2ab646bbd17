//! Response-shape tolerant parsing.
//!
//! Providers answer in several shapes depending on the endpoint and serving
//! stack. Generated text is found by running a fixed list of extractors in
//! order; the first non-empty string wins. Error bodies get the same
//! treatment for their message and code.

use serde_json::Value;

/// Field names that may carry generated text in legacy / raw shapes.
const TEXT_FIELDS: &[&str] = &["generated_text", "output_text", "text"];

/// Error text recorded from a failed response is cut to this many chars.
pub const MAX_ERROR_BODY_CHARS: usize = 200;

/// Fallback message when an error body carries nothing usable.
pub const GENERIC_API_ERROR: &str = "inference API error";

type Extractor = fn(&Value) -> Option<String>;

const EXTRACTORS: &[Extractor] = &[
    from_choices,
    from_legacy_object,
    from_candidate_array,
    from_bare_string,
];

/// Generated text from a parsed body, trimmed; `None` if nothing matches.
pub fn extract_text(value: &Value) -> Option<String> {
    EXTRACTORS.iter().find_map(|extract| extract(value))
}

/// Generated text from a raw 2xx body. A body that is not JSON is taken as
/// plain text.
pub fn extract_text_from_body(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => extract_text(&value),
        Err(_) => non_empty(body),
    }
}

/// `choices[].message.content` or `choices[].text`.
fn from_choices(value: &Value) -> Option<String> {
    value.get("choices")?.as_array()?.iter().find_map(|choice| {
        choice
            .pointer("/message/content")
            .and_then(Value::as_str)
            .and_then(non_empty)
            .or_else(|| choice.get("text").and_then(Value::as_str).and_then(non_empty))
    })
}

/// `{ "generated_text": ... }` and friends.
fn from_legacy_object(value: &Value) -> Option<String> {
    value.as_object()?;
    text_field(value)
}

/// `[ "text", ... ]` or `[ { "generated_text": ... }, ... ]`.
fn from_candidate_array(value: &Value) -> Option<String> {
    value.as_array()?.iter().find_map(|item| match item {
        Value::String(s) => non_empty(s),
        Value::Object(_) => text_field(item),
        _ => None,
    })
}

fn from_bare_string(value: &Value) -> Option<String> {
    value.as_str().and_then(non_empty)
}

fn text_field(value: &Value) -> Option<String> {
    TEXT_FIELDS
        .iter()
        .find_map(|field| value.get(*field).and_then(Value::as_str).and_then(non_empty))
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ── Error bodies ──────────────────────────────────────────────────────────────

/// Human-readable error from a failed response body.
///
/// Priority: `error` (string, or object `message`), then `message`, then the
/// raw body text, then [`GENERIC_API_ERROR`].
pub fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let structured = parsed.as_ref().and_then(|v| {
        let from_error = match v.get("error") {
            Some(Value::String(s)) => non_empty(s),
            Some(obj @ Value::Object(_)) => obj.get("message").and_then(Value::as_str).and_then(non_empty),
            _ => None,
        };
        from_error.or_else(|| v.get("message").and_then(Value::as_str).and_then(non_empty))
    });

    structured
        .or_else(|| non_empty(body))
        .map(|s| truncate_chars(&s, MAX_ERROR_BODY_CHARS))
        .unwrap_or_else(|| GENERIC_API_ERROR.to_string())
}

/// Machine-readable error code, if the body carries one
/// (`error.code`, `error.type`, or top-level `code`).
pub fn error_code(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    let error = value.get("error");
    error
        .and_then(|e| e.get("code"))
        .or_else(|| error.and_then(|e| e.get("type")))
        .or_else(|| value.get("code"))
        .and_then(|code| match code {
            Value::String(s) => non_empty(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Cut `s` to at most `max` characters on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
