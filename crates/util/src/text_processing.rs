//! Text helpers for logging and output shaping.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const REDACTED: &str = "<redacted>";

static SENSITIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization: )([\w\-\.=:/+]+)",
        r"(?i)([A-Z0-9_]*?(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)",
        r"(?i)(DATABASE_URL=)([^\s]+)",
        r"(?i)([a-z][a-z0-9+.\-]*://[^/\s:@]+:)([^/\s@]+)(@)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

static SENSITIVE_KEY: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)(authorization|password|passwd|secret|token|api[_-]?key|private[_-]?key)").ok());

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in SENSITIVE_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                let suffix = caps.get(3).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}{REDACTED}{suffix}")
            })
            .to_string();
    }
    redacted
}

/// Recursively redacts sensitive data from JSON values.
///
/// String values are scrubbed with [`redact_sensitive`]. Values stored under
/// credential-looking object keys (`password`, `Authorization`, `api_key`, ...)
/// are replaced wholesale, whatever their type.
pub fn redact_json(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(redact_sensitive(text)),
        Value::Array(items) => Value::Array(items.iter().map(redact_json).collect()),
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, entry) in map {
                let redacted = if is_sensitive_key(key) {
                    Value::String(REDACTED.to_string())
                } else {
                    redact_json(entry)
                };
                out.insert(key.clone(), redacted);
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEY.as_ref().is_some_and(|pattern| pattern.is_match(key))
}

/// Keep the first `max_chars` characters of `text`, appending `marker` when
/// anything was cut. Text at or under the limit is returned unchanged.
pub fn truncate_with_marker(text: &str, max_chars: usize, marker: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], marker),
        None => text.to_string(),
    }
}
