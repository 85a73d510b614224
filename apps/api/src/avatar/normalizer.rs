//! Avatar URL extraction from loosely shaped model output.
//!
//! The model may answer with a bare string, a list of strings or objects, or
//! an object nesting one of those under `output` / `images`. Resolution is
//! depth-first and the first match wins:
//!
//! 1. absent / empty string → nothing
//! 2. string → itself
//! 3. sequence → per element: string, else `image`, else recurse into an
//!    `output` sequence; skip anything else
//! 4. object → `image`, else recurse into an `images` sequence, else recurse
//!    into `output` whatever its shape
//!
//! Every recursive call descends into a strict sub-value, so resolution
//! always terminates.

use serde_json::{Map, Value};

/// Runtime shape of a model output value.
#[derive(Debug, Clone, Copy)]
pub enum OutputShape<'a> {
    Absent,
    Text(&'a str),
    Sequence(&'a [Value]),
    Record(&'a Map<String, Value>),
    /// Numbers and booleans never carry a URL.
    Scalar,
}

impl<'a> OutputShape<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Null => OutputShape::Absent,
            Value::String(s) if s.is_empty() => OutputShape::Absent,
            Value::String(s) => OutputShape::Text(s),
            Value::Array(items) => OutputShape::Sequence(items),
            Value::Object(map) => OutputShape::Record(map),
            Value::Bool(_) | Value::Number(_) => OutputShape::Scalar,
        }
    }
}

/// Picks the single representative avatar URL out of a model response.
pub fn resolve_avatar_url(output: &Value) -> Option<String> {
    match OutputShape::classify(output) {
        OutputShape::Text(url) => Some(url.to_string()),
        OutputShape::Sequence(items) => resolve_sequence(items),
        OutputShape::Record(map) => resolve_record(map),
        OutputShape::Absent | OutputShape::Scalar => None,
    }
}

fn resolve_sequence(items: &[Value]) -> Option<String> {
    for item in items {
        match OutputShape::classify(item) {
            OutputShape::Text(url) => return Some(url.to_string()),
            OutputShape::Record(map) => {
                if let Some(url) = image_field(map) {
                    return Some(url);
                }
                if let Some(Value::Array(nested)) = map.get("output") {
                    if let Some(url) = resolve_sequence(nested) {
                        return Some(url);
                    }
                }
            }
            _ => continue,
        }
    }
    None
}

fn resolve_record(map: &Map<String, Value>) -> Option<String> {
    if let Some(url) = image_field(map) {
        return Some(url);
    }
    if let Some(Value::Array(images)) = map.get("images") {
        if let Some(url) = resolve_sequence(images) {
            return Some(url);
        }
    }
    map.get("output").and_then(resolve_avatar_url)
}

/// An `image` field only counts when it holds a non-empty string.
fn image_field(map: &Map<String, Value>) -> Option<String> {
    match map.get("image") {
        Some(Value::String(url)) if !url.is_empty() => Some(url.clone()),
        _ => None,
    }
}
