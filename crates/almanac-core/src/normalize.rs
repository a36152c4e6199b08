//! Rich-text field normalization.
//!
//! Bitable text cells arrive in several shapes: plain prose, a JSON array of
//! rich-text segments (`[{"text": "...", "type": "text"}]`), a single segment
//! object, a Python-style list literal using single quotes, or an already
//! parsed JSON value. [`normalize`] and [`normalize_value`] flatten all of
//! them into a single display string.
//!
//! Each strategy returns `Some(text)` when it recognises the input and `None`
//! otherwise; the first match wins and the raw input is the final fallback.
//! Nothing in this module fails or panics.
//!
//! # Example
//!
//! ```
//! use almanac_core::normalize::normalize;
//!
//! assert_eq!(normalize(r#"[{"text": "a", "type": "text"}]"#), "a");
//! assert_eq!(normalize("[{'text': 'a', 'type': 'text'}, {'text': 'b', 'type': 'text'}]"), "a b");
//! assert_eq!(normalize("plain prose"), "plain prose");
//! ```

use serde_json::{Map, Value};

/// Separator placed between extracted text segments.
const SEGMENT_SEPARATOR: &str = " ";

/// Normalize a raw string field into display text.
///
/// Empty and whitespace-only strings are returned unchanged.
pub fn normalize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return raw.to_string();
    }

    single_quoted_segments(raw)
        .or_else(|| json_text(raw))
        .unwrap_or_else(|| raw.to_string())
}

/// Normalize an arbitrary field value into display text.
///
/// - absent or `null` becomes `""`
/// - strings go through [`normalize`]
/// - arrays and objects go through the structured segment extraction, and
///   fall back to their compact JSON text
/// - other scalars render as their JSON text
pub fn normalize_value(raw: Option<&Value>) -> String {
    match raw {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => normalize(s),
        Some(value @ (Value::Array(_) | Value::Object(_))) => {
            extract_parsed(value).unwrap_or_else(|| value.to_string())
        }
        Some(other) => other.to_string(),
    }
}

/// Python-style list literal: `[{'text': '...', 'type': 'text'}]`.
///
/// Quote swapping corrupts content that contains apostrophes or embedded
/// double quotes; such input fails to parse here and is handed on to the
/// generic JSON strategy.
fn single_quoted_segments(raw: &str) -> Option<String> {
    if !(raw.starts_with('[') && raw.contains("'text'") && raw.contains("'type'")) {
        return None;
    }

    let swapped = raw.replace('\'', "\"");
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&swapped) else {
        return None;
    };

    let mut texts = Vec::new();
    for item in &items {
        if let Some(text) = item.as_object().and_then(|obj| obj.get("text")) {
            texts.push(text.as_str()?);
        }
    }

    if texts.is_empty() {
        // Parsed cleanly but carried no segments; keep the original.
        return Some(raw.to_string());
    }
    Some(texts.join(SEGMENT_SEPARATOR))
}

/// Strict JSON array or object text.
fn json_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let looks_like_json = (trimmed.starts_with('[') && trimmed.ends_with(']'))
        || (trimmed.starts_with('{') && trimmed.ends_with('}'));
    if !looks_like_json {
        return None;
    }

    let value: Value = serde_json::from_str(trimmed).ok()?;
    extract_parsed(&value)
}

/// Structured extraction shared by string-encoded and already-parsed values.
fn extract_parsed(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => extract_segments(items),
        Value::Object(obj) => object_text(obj),
        _ => None,
    }
}

/// Text of a lone object: its `text` value whatever the type (`null` renders
/// empty), else the first string value in key order.
fn object_text(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("text") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) => Some(String::new()),
        Some(other) => Some(other.to_string()),
        None => first_string_value(obj).map(str::to_string),
    }
}

fn extract_segments(items: &[Value]) -> Option<String> {
    let mut texts = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(obj) => {
                if let Some(text) = segment_text(obj) {
                    texts.push(text);
                } else if obj.contains_key("text") {
                    return None;
                }
            }
            Value::String(s) => texts.push(s.as_str()),
            _ => {}
        }
    }

    if texts.is_empty() {
        None
    } else {
        Some(texts.join(SEGMENT_SEPARATOR))
    }
}

/// Text carried by one segment inside an array.
///
/// A `text` key wins (a `"type": "text"` tag does not change the outcome);
/// a non-string `text` yields `None`, which abandons the whole array. Without
/// a `text` key the first string value in key order is used.
fn segment_text(obj: &Map<String, Value>) -> Option<&str> {
    match obj.get("text") {
        Some(text) => text.as_str(),
        None => first_string_value(obj),
    }
}

fn first_string_value(obj: &Map<String, Value>) -> Option<&str> {
    obj.values().find_map(Value::as_str)
}
