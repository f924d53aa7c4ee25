//! HTML scrubbing for untrusted request input.
//!
//! Every tag is removed. The bodies of elements that never carry readable
//! text (`script`, `style`, `textarea`, `option`) are dropped along with
//! their tags; for all other elements the inner text is kept.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static NON_TEXT_ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<textarea\b[^>]*>.*?</textarea\s*>|<option\b[^>]*>.*?</option\s*>",
    )
    .expect("valid regex")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z!][^>]*>").expect("valid regex"));

/// Object keys that are silently dropped from sanitized input.
const FORBIDDEN_KEYS: &[&str] = &["__proto__", "constructor", "prototype"];

/// Strip all markup from `input` and trim surrounding whitespace.
pub fn clean_text(input: &str) -> String {
    let without_blocks = NON_TEXT_ELEMENT_RE.replace_all(input, "");
    TAG_RE.replace_all(&without_blocks, "").trim().to_string()
}

/// Recursively sanitize every string inside a JSON value.
///
/// Non-string scalars pass through untouched.
pub fn clean_json(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(clean_text(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(clean_json).collect()),
        Value::Object(map) => Value::Object(clean_object(map)),
        other => other,
    }
}

fn clean_object(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter(|(key, _)| !FORBIDDEN_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key, clean_json(value)))
        .collect()
}
