//! Parsing of the stdin payload and merging of `source` with `params`.

use http_resource_types::Configuration;
use http_resource_util::is_truthy_json;
use serde_json::Value;

use crate::error::ResourceError;

/// The `{"source": {...}, "params": {...}}` payload read from stdin.
///
/// Both sections default to empty. Other top-level keys (such as `version`)
/// are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceInput {
    pub source: Configuration,
    pub params: Configuration,
}

impl ResourceInput {
    pub fn parse(payload: &str) -> Result<Self, ResourceError> {
        let document: Value = serde_json::from_str(payload).map_err(|error| ResourceError::InputParse(error.to_string()))?;
        let Value::Object(mut document) = document else {
            return Err(ResourceError::InputParse("payload must be a JSON object".to_string()));
        };

        Ok(Self {
            source: take_section(&mut document, "source")?,
            params: take_section(&mut document, "params")?,
        })
    }

    /// `source` overlaid with `params`. Colliding keys take the `params`
    /// value wholesale; nested maps are not merged.
    pub fn merged_params(&self) -> Configuration {
        let mut merged = self.source.clone();
        for (key, value) in &self.params {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Whether `source.debug` asks for console debug logging.
    pub fn debug_requested(&self) -> bool {
        self.source.get("debug").is_some_and(is_truthy_json)
    }
}

fn take_section(document: &mut Configuration, name: &str) -> Result<Configuration, ResourceError> {
    match document.remove(name) {
        None | Some(Value::Null) => Ok(Configuration::new()),
        Some(Value::Object(section)) => Ok(section),
        Some(other) => Err(ResourceError::InputParse(format!(
            "'{name}' must be an object, got {}",
            kind_of(&other)
        ))),
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
