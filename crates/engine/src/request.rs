//! Derivation of the outbound request from an interpolated configuration.
//!
//! Recognized keys: `method`, `uri`, `headers`, `json`, `form_data`,
//! `ssl_verify`, and `ok_responses`. Anything else is ignored here but still
//! available to placeholders.

use http_resource_types::{Configuration, RequestBody, TlsVerification, TransportRequest};
use http_resource_util::to_spaced_ascii_json;
use indexmap::IndexSet;
use serde_json::Value;
use url::Url;

use crate::error::ResourceError;
use crate::input::kind_of;

pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_OK_RESPONSES: [u16; 4] = [200, 201, 202, 204];

/// The `ssl_verify` setting as written in the configuration.
///
/// Inline authority material still has to be written to disk before the
/// transport can use it; see [`crate::tls::materialize_tls`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsSetting {
    Verify(bool),
    InlineAuthority(String),
}

impl Default for TlsSetting {
    fn default() -> Self {
        TlsSetting::Verify(true)
    }
}

/// Status codes treated as success, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedStatuses(IndexSet<u16>);

impl Default for AcceptedStatuses {
    fn default() -> Self {
        Self(DEFAULT_OK_RESPONSES.into_iter().collect())
    }
}

impl AcceptedStatuses {
    pub fn contains(&self, status: u16) -> bool {
        self.0.contains(&status)
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    fn from_value(value: &Value) -> Result<Self, ResourceError> {
        let Value::Array(items) = value else {
            return Err(ResourceError::invalid_field(
                "ok_responses",
                format!("expected an array of status codes, got {}", kind_of(value)),
            ));
        };

        let mut statuses = IndexSet::with_capacity(items.len());
        for item in items {
            let status = item
                .as_u64()
                .filter(|code| (100..=999).contains(code))
                .ok_or_else(|| ResourceError::invalid_field("ok_responses", format!("{item} is not an HTTP status code")))?;
            statuses.insert(status as u16);
        }
        if statuses.is_empty() {
            return Err(ResourceError::invalid_field("ok_responses", "must list at least one status code"));
        }
        Ok(Self(statuses))
    }
}

/// Everything needed to issue and judge the single request of an invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: String,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    pub tls: TlsSetting,
    pub accepted: AcceptedStatuses,
}

impl RequestSpec {
    pub fn from_configuration(configuration: &Configuration) -> Result<Self, ResourceError> {
        let uri = uri(configuration)?;
        let method = method(configuration)?;
        let json = present(configuration, "json").cloned();
        let form = form_fields(configuration)?;
        let body = match (json, form) {
            (Some(_), Some(_)) => {
                return Err(ResourceError::invalid_field("form_data", "cannot be combined with 'json'"));
            }
            (Some(json), None) => RequestBody::Json(json),
            (None, Some(fields)) => RequestBody::Form(fields),
            (None, None) => RequestBody::Empty,
        };

        Ok(Self {
            method,
            uri,
            headers: headers(configuration)?,
            body,
            tls: tls_setting(configuration)?,
            accepted: present(configuration, "ok_responses")
                .map(AcceptedStatuses::from_value)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// Pair the derived request with a materialized TLS mode for the transport.
    pub fn transport_request(&self, tls: TlsVerification) -> TransportRequest {
        TransportRequest {
            method: self.method.clone(),
            uri: self.uri.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            tls,
        }
    }
}

/// A key's value, treating explicit `null` as absent.
fn present<'a>(configuration: &'a Configuration, key: &str) -> Option<&'a Value> {
    configuration.get(key).filter(|value| !value.is_null())
}

fn method(configuration: &Configuration) -> Result<String, ResourceError> {
    let Some(value) = present(configuration, "method") else {
        return Ok(DEFAULT_METHOD.to_string());
    };
    let Value::String(method) = value else {
        return Err(ResourceError::invalid_field("method", format!("expected a string, got {}", kind_of(value))));
    };

    let method = method.trim().to_ascii_uppercase();
    if method.is_empty() || !method.bytes().all(is_token_byte) {
        return Err(ResourceError::invalid_field("method", format!("'{method}' is not an HTTP method")));
    }
    Ok(method)
}

fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&byte)
}

fn uri(configuration: &Configuration) -> Result<String, ResourceError> {
    let value = present(configuration, "uri").ok_or(ResourceError::MissingField("uri"))?;
    let Value::String(uri) = value else {
        return Err(ResourceError::invalid_field("uri", format!("expected a string, got {}", kind_of(value))));
    };
    Url::parse(uri).map_err(|error| ResourceError::invalid_field("uri", error.to_string()))?;
    Ok(uri.clone())
}

fn headers(configuration: &Configuration) -> Result<Vec<(String, String)>, ResourceError> {
    let Some(value) = present(configuration, "headers") else {
        return Ok(Vec::new());
    };
    let Value::Object(map) = value else {
        return Err(ResourceError::invalid_field("headers", format!("expected an object, got {}", kind_of(value))));
    };

    map.iter()
        .map(|(name, value)| {
            let text = match value {
                Value::String(text) => text.clone(),
                Value::Number(_) | Value::Bool(_) => value.to_string(),
                other => {
                    return Err(ResourceError::invalid_field(
                        "headers",
                        format!("value for '{name}' must be a string, got {}", kind_of(other)),
                    ));
                }
            };
            Ok((name.clone(), text))
        })
        .collect()
}

/// `form_data` fields with every value rendered as JSON text, so a nested
/// map becomes one field holding `{"key": value}` rather than nested fields.
fn form_fields(configuration: &Configuration) -> Result<Option<Vec<(String, String)>>, ResourceError> {
    let Some(value) = present(configuration, "form_data") else {
        return Ok(None);
    };
    let Value::Object(map) = value else {
        return Err(ResourceError::invalid_field("form_data", format!("expected an object, got {}", kind_of(value))));
    };
    if map.is_empty() {
        return Ok(None);
    }

    map.iter()
        .map(|(name, value)| Ok((name.clone(), to_spaced_ascii_json(value)?)))
        .collect::<Result<Vec<_>, ResourceError>>()
        .map(Some)
}

fn tls_setting(configuration: &Configuration) -> Result<TlsSetting, ResourceError> {
    match present(configuration, "ssl_verify") {
        None => Ok(TlsSetting::default()),
        Some(Value::Bool(verify)) => Ok(TlsSetting::Verify(*verify)),
        Some(Value::String(material)) if material.trim().is_empty() => {
            Err(ResourceError::invalid_field("ssl_verify", "certificate authority material is empty"))
        }
        Some(Value::String(material)) => Ok(TlsSetting::InlineAuthority(material.clone())),
        Some(other) => Err(ResourceError::invalid_field(
            "ssl_verify",
            format!("expected a boolean or PEM text, got {}", kind_of(other)),
        )),
    }
}
