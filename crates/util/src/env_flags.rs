//! Flag helpers for environment variables and loosely typed JSON switches.

use serde_json::Value;

/// True when the variable is set to any non-empty value.
///
/// `RESOURCE_DEBUG=0` still enables the flag; only unset or empty disables it.
pub fn env_flag_enabled(name: &str) -> bool {
    std::env::var_os(name).is_some_and(|value| !value.is_empty())
}

/// Truthiness of a JSON switch such as `source.debug`.
///
/// `false`, `null`, zero, and empty strings, arrays, or objects are false.
pub fn is_truthy_json(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
