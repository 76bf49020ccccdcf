//! Failure taxonomy for one resource invocation.
//!
//! Every variant is terminal: the invocation stops, nothing is written to
//! stdout, and the process exits non-zero.

use http_resource_api::ClientError;
use http_resource_util::InterpolationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("could not parse input payload: {0}")]
    InputParse(String),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error(transparent)]
    Template(#[from] InterpolationError),

    #[error("unexpected response {status}: {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] ClientError),

    #[error("could not decode response body as a JSON object: {0}")]
    ResponseDecode(String),

    #[error("could not serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ResourceError {
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
