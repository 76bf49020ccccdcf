//! Output envelope construction and rendering.

use chrono::{DateTime, SecondsFormat, Utc};
use http_resource_types::{InvocationResult, MetadataEntry, OutputEnvelope};
use http_resource_util::truncate_with_marker;
use serde_json::Value;

use crate::error::ResourceError;

/// Characters of the response body kept in metadata and error messages.
pub const RESPONSE_PREVIEW_CHARS: usize = 100;
/// Appended to a response preview that was cut short.
pub const TRUNCATION_MARKER: &str = "... (truncated)";

pub const METADATA_TIMESTAMP: &str = "timestamp";
pub const METADATA_RESPONSE_CODE: &str = "http_response_code";
pub const METADATA_RESPONSE_BODY: &str = "http_response_body";

/// How the envelope is rendered to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Only the envelope.
    #[default]
    Production,
    /// The envelope with the decoded response body merged over its top-level
    /// keys, so end-to-end tests can assert on what the server received.
    TestObservation,
}

/// First [`RESPONSE_PREVIEW_CHARS`] characters of `body`, marked when cut.
pub fn response_preview(body: &str) -> String {
    truncate_with_marker(body, RESPONSE_PREVIEW_CHARS, TRUNCATION_MARKER)
}

pub fn build_envelope(response: &InvocationResult, timestamp: DateTime<Utc>) -> OutputEnvelope {
    OutputEnvelope {
        version: serde_json::Map::new(),
        metadata: vec![
            MetadataEntry::new(METADATA_TIMESTAMP, timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)),
            MetadataEntry::new(METADATA_RESPONSE_CODE, response.status.to_string()),
            MetadataEntry::new(METADATA_RESPONSE_BODY, response_preview(&response.body)),
        ],
    }
}

/// Render the JSON document written to stdout.
pub fn render_output(envelope: &OutputEnvelope, response: &InvocationResult, mode: OutputMode) -> Result<Value, ResourceError> {
    let mut rendered = serde_json::to_value(envelope)?;
    if mode == OutputMode::Production {
        return Ok(rendered);
    }

    let decoded: Value = serde_json::from_str(&response.body).map_err(|error| ResourceError::ResponseDecode(error.to_string()))?;
    let Value::Object(fields) = decoded else {
        return Err(ResourceError::ResponseDecode("response body is not a JSON object".to_string()));
    };
    if let Value::Object(target) = &mut rendered {
        target.extend(fields);
    }
    Ok(rendered)
}
