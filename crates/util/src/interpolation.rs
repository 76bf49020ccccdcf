//! Placeholder interpolation for resource configuration.
//!
//! Strings inside a [`Configuration`] may contain `{name}` placeholders. They
//! are resolved against a [`SubstitutionDictionary`] built from selected build
//! environment variables and the configuration itself. Substitution is a
//! single pass: text produced by a substitution is never scanned again.

use std::collections::HashMap;
use std::ffi::OsString;

use http_resource_types::Configuration;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Environment variables starting with this prefix are available as placeholders.
pub const SUBSTITUTION_ENV_PREFIX: &str = "BUILD_";
/// The orchestrator's external URL, also available as a placeholder.
pub const EXTERNAL_URL_ENV_VAR: &str = "ATC_EXTERNAL_URL";

/// Errors that can occur during interpolation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterpolationError {
    #[error("missing substitution key '{key}'")]
    MissingKey { key: String },

    #[error("unmatched brace in template '{template}'")]
    UnmatchedBrace { template: String },

    #[error("empty placeholder '{{}}' in template '{template}'")]
    EmptyPlaceholder { template: String },
}

/// Flat `name -> text` lookup used to resolve placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionDictionary {
    entries: HashMap<String, String>,
}

impl SubstitutionDictionary {
    /// Build a dictionary from the current process environment.
    pub fn from_environment() -> Self {
        Self::from_variables(std::env::vars_os())
    }

    /// Build a dictionary from `(name, value)` pairs, keeping only `BUILD_*`
    /// variables and `ATC_EXTERNAL_URL`. Non-UTF-8 pairs are skipped.
    pub fn from_variables<I>(variables: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let entries = variables
            .into_iter()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .filter(|(name, _)| is_substitution_variable(name))
            .collect();
        Self { entries }
    }

    /// Layer configuration entries on top of the current entries.
    ///
    /// Configuration keys win over environment variables of the same name.
    /// Non-string values are stored as their JSON text.
    pub fn with_configuration(mut self, configuration: &Configuration) -> Self {
        for (key, value) in configuration {
            self.entries.insert(key.clone(), substitution_text(value));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Dictionary keys in sorted order, for logging.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl<K, V> FromIterator<(K, V)> for SubstitutionDictionary
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
        }
    }
}

fn is_substitution_variable(name: &str) -> bool {
    name.starts_with(SUBSTITUTION_ENV_PREFIX) || name == EXTERNAL_URL_ENV_VAR
}

fn substitution_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Resolve every placeholder in `template`.
///
/// `{{` and `}}` produce literal braces. A placeholder must name a dictionary
/// key exactly; lone or unterminated braces are rejected.
pub fn substitute(template: &str, dictionary: &SubstitutionDictionary) -> Result<String, InterpolationError> {
    let unmatched = || InterpolationError::UnmatchedBrace {
        template: template.to_string(),
    };

    let mut rendered = String::with_capacity(template.len());
    let mut remainder = template;

    while let Some(index) = remainder.find(['{', '}']) {
        rendered.push_str(&remainder[..index]);
        let tail = &remainder[index..];

        if let Some(rest) = tail.strip_prefix("{{") {
            rendered.push('{');
            remainder = rest;
            continue;
        }
        if let Some(rest) = tail.strip_prefix("}}") {
            rendered.push('}');
            remainder = rest;
            continue;
        }
        let Some(after_open) = tail.strip_prefix('{') else {
            return Err(unmatched());
        };

        let close = after_open.find(['{', '}']).ok_or_else(unmatched)?;
        if !after_open[close..].starts_with('}') {
            return Err(unmatched());
        }
        let key = &after_open[..close];
        if key.is_empty() {
            return Err(InterpolationError::EmptyPlaceholder {
                template: template.to_string(),
            });
        }
        let value = dictionary
            .get(key)
            .ok_or_else(|| InterpolationError::MissingKey { key: key.to_string() })?;
        rendered.push_str(value);
        remainder = &after_open[close + 1..];
    }

    rendered.push_str(remainder);
    Ok(rendered)
}

/// Interpolate a configuration, returning a new one.
///
/// Keys and string values are substituted; nested maps recurse with the same
/// dictionary. Numbers, booleans, null, and sequences are copied unchanged.
pub fn interpolate(configuration: &Configuration, dictionary: &SubstitutionDictionary) -> Result<Configuration, InterpolationError> {
    let mut rendered = Configuration::new();
    for (key, value) in configuration {
        let rendered_key = substitute(key, dictionary)?;
        let rendered_value = match value {
            Value::String(text) => Value::String(substitute(text, dictionary)?),
            Value::Object(nested) => Value::Object(interpolate(nested, dictionary)?),
            other => other.clone(),
        };
        if rendered_key != *key {
            debug!(key = %key, rendered_key = %rendered_key, "interpolated configuration key");
        }
        rendered.insert(rendered_key, rendered_value);
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dictionary(entries: &[(&str, &str)]) -> SubstitutionDictionary {
        entries.iter().map(|(key, value)| (*key, *value)).collect()
    }

    fn configuration(value: Value) -> Configuration {
        match value {
            Value::Object(map) => map,
            _ => panic!("test configuration must be an object"),
        }
    }

    #[test]
    fn substitute_replaces_known_placeholder() {
        let values = dictionary(&[("X", "hello")]);
        assert_eq!(substitute("{X} world", &values).unwrap(), "hello world");
    }

    #[test]
    fn substitute_reports_missing_key() {
        let values = dictionary(&[("X", "hello")]);
        let error = substitute("{Y} world", &values).unwrap_err();
        assert_eq!(error, InterpolationError::MissingKey { key: "Y".into() });
        assert_eq!(error.to_string(), "missing substitution key 'Y'");
    }

    #[test]
    fn substitute_treats_doubled_braces_as_literals() {
        let values = dictionary(&[("X", "1")]);
        assert_eq!(substitute("{{\"a\": {X}}}", &values).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn substitute_rejects_malformed_templates() {
        let values = dictionary(&[("X", "1")]);
        for template in ["{X", "X}", "{X{Y}}", "}{"] {
            assert!(
                matches!(substitute(template, &values), Err(InterpolationError::UnmatchedBrace { .. })),
                "{template} should be rejected"
            );
        }
        assert!(matches!(
            substitute("a{}b", &values),
            Err(InterpolationError::EmptyPlaceholder { .. })
        ));
    }

    #[test]
    fn substitute_is_single_pass() {
        let values = dictionary(&[("A", "{B}"), ("B", "never")]);
        assert_eq!(substitute("{A}", &values).unwrap(), "{B}");
    }

    #[test]
    fn interpolate_rewrites_keys_and_nested_maps() {
        let values = dictionary(&[("BUILD_ID", "42"), ("HEADER", "X-Build")]);
        let input = configuration(json!({
            "uri": "https://ci.example.com/builds/{BUILD_ID}",
            "headers": { "{HEADER}": "{BUILD_ID}" },
            "retries": 3,
            "enabled": true,
            "nothing": null,
            "list": ["{BUILD_ID}"]
        }));

        let rendered = interpolate(&input, &values).unwrap();

        assert_eq!(
            Value::Object(rendered),
            json!({
                "uri": "https://ci.example.com/builds/42",
                "headers": { "X-Build": "42" },
                "retries": 3,
                "enabled": true,
                "nothing": null,
                "list": ["{BUILD_ID}"]
            })
        );
    }

    #[test]
    fn interpolate_fails_on_missing_key_in_nested_map() {
        let input = configuration(json!({ "headers": { "Authorization": "Bearer {TOKEN}" } }));
        let error = interpolate(&input, &SubstitutionDictionary::default()).unwrap_err();
        assert_eq!(error, InterpolationError::MissingKey { key: "TOKEN".into() });
    }

    #[test]
    fn interpolate_is_idempotent_on_resolved_output() {
        let values = dictionary(&[("BUILD_NAME", "7"), ("team", "core")]);
        let input = configuration(json!({
            "uri": "https://example.com/{team}/{BUILD_NAME}",
            "json": { "team": "{team}", "n": 1 }
        }));

        let once = interpolate(&input, &values).unwrap();
        let twice = interpolate(&once, &values).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn dictionary_keeps_only_build_variables_and_external_url() {
        let values = SubstitutionDictionary::from_variables([
            (OsString::from("BUILD_ID"), OsString::from("1")),
            (OsString::from("ATC_EXTERNAL_URL"), OsString::from("https://ci")),
            (OsString::from("HOME"), OsString::from("/root")),
            (OsString::from("REBUILD_ID"), OsString::from("2")),
        ]);

        assert_eq!(values.keys(), vec!["ATC_EXTERNAL_URL", "BUILD_ID"]);
    }

    #[test]
    fn dictionary_configuration_overrides_environment_and_stringifies() {
        let values = dictionary(&[("BUILD_ID", "from-env")]).with_configuration(&configuration(json!({
            "BUILD_ID": "from-config",
            "port": 8080,
            "secure": false,
            "empty": null,
            "nested": { "a": 1 }
        })));

        assert_eq!(values.get("BUILD_ID"), Some("from-config"));
        assert_eq!(values.get("port"), Some("8080"));
        assert_eq!(values.get("secure"), Some("false"));
        assert_eq!(values.get("empty"), Some("null"));
        assert_eq!(values.get("nested"), Some("{\"a\":1}"));
    }

    #[test]
    fn from_environment_reads_process_variables() {
        temp_env::with_vars(
            [
                ("BUILD_PIPELINE_NAME", Some("deploy")),
                (EXTERNAL_URL_ENV_VAR, Some("https://ci.example.com")),
                ("INTERPOLATION_UNRELATED", Some("ignored")),
            ],
            || {
                let values = SubstitutionDictionary::from_environment();
                assert_eq!(values.get("BUILD_PIPELINE_NAME"), Some("deploy"));
                assert_eq!(values.get(EXTERNAL_URL_ENV_VAR), Some("https://ci.example.com"));
                assert_eq!(values.get("INTERPOLATION_UNRELATED"), None);
            },
        );
    }
}
