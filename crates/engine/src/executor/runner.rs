//! One invocation from merged parameters to a classified response.

use std::env;
use std::path::PathBuf;

use chrono::Utc;
use http_resource_types::{InvocationResult, OutputEnvelope, Verb};
use http_resource_util::{SubstitutionDictionary, interpolate, redact_json, redact_sensitive};
use serde_json::Value;
use tracing::{debug, info};

use super::transport::Transport;
use crate::error::ResourceError;
use crate::input::ResourceInput;
use crate::output::{build_envelope, response_preview};
use crate::request::{AcceptedStatuses, RequestSpec};
use crate::tls::materialize_tls;

/// A successful invocation: the envelope to emit and the response it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationOutcome {
    pub envelope: OutputEnvelope,
    pub response: InvocationResult,
}

/// Runs one verb end to end: merge, interpolate, derive, call, classify.
///
/// All three verbs share this path; the verb is only carried for logging.
pub struct ResourceRunner<T> {
    transport: T,
    environment: SubstitutionDictionary,
    scratch_dir: PathBuf,
}

impl<T: Transport> ResourceRunner<T> {
    /// Create a runner with the environment half of the substitution
    /// dictionary. Temporary files go to the system temp directory.
    pub fn new(transport: T, environment: SubstitutionDictionary) -> Self {
        Self {
            transport,
            environment,
            scratch_dir: env::temp_dir(),
        }
    }

    /// Directory for the certificate authority files written for `ssl_verify`.
    pub fn with_scratch_dir(mut self, scratch_dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = scratch_dir.into();
        self
    }

    pub async fn run(&self, verb: Verb, input: &ResourceInput) -> Result<InvocationOutcome, ResourceError> {
        let merged = input.merged_params();

        // Built from the merged params before interpolation, so a placeholder
        // naming another param receives that param's raw text.
        let dictionary = self.environment.clone().with_configuration(&merged);
        debug!(command = %verb, keys = ?dictionary.keys(), "built substitution dictionary");

        let resolved = interpolate(&merged, &dictionary)?;
        let logged_params = redact_json(&Value::Object(resolved.clone()));
        debug!(command = %verb, params = %logged_params, "resolved parameters");

        let spec = RequestSpec::from_configuration(&resolved)?;
        let tls = materialize_tls(&spec.tls, &self.scratch_dir)?;
        let request = spec.transport_request(tls);
        debug!(command = %verb, method = %request.method, uri = %redact_sensitive(&request.uri), "sending request");

        let response = self.transport.execute(&request).await?;
        info!("http response code: {}", response.status);
        info!("http response text: {}", redact_sensitive(&response.body));

        let response = classify(response, &spec.accepted)?;
        Ok(InvocationOutcome {
            envelope: build_envelope(&response, Utc::now()),
            response,
        })
    }
}

/// Accept the response when its status is in `accepted`.
pub fn classify(response: InvocationResult, accepted: &AcceptedStatuses) -> Result<InvocationResult, ResourceError> {
    if accepted.contains(response.status) {
        return Ok(response);
    }
    Err(ResourceError::UnexpectedResponse {
        status: response.status,
        body: response_preview(&response.body),
    })
}
