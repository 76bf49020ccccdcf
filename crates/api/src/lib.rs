//! HTTP client for the resource's single outbound request.
//!
//! This module wraps `reqwest` so the rest of the workspace only deals in
//! [`TransportRequest`] and [`InvocationResult`]. It focuses on:
//!
//! - Building a client for the requested TLS verification mode
//! - Applying method, headers, and a JSON or form-encoded body
//! - Returning the status code and text body without interpreting them
//!
//! Redirects, connection pooling, and timeouts are left at reqwest's defaults.
//!
//! # Example
//!
//! ```ignore
//! use http_resource_api::ResourceClient;
//! use http_resource_types::{RequestBody, TlsVerification, TransportRequest};
//!
//! let request = TransportRequest {
//!     method: "GET".into(),
//!     uri: "https://example.com/health".into(),
//!     headers: vec![],
//!     body: RequestBody::Empty,
//!     tls: TlsVerification::Enabled,
//! };
//! let client = ResourceClient::new(&request.tls)?;
//! let result = client.execute(&request).await?;
//! println!("status: {}", result.status);
//! ```

use std::path::{Path, PathBuf};
use std::{env, fs};

use http_resource_types::{InvocationResult, RequestBody, TlsVerification, TransportRequest};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Certificate, Client, Method};
use thiserror::Error;
use tracing::debug;

/// Errors raised by the transport. None of them are retried.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not build the HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("could not load certificate authority bundle '{}': {reason}", path.display())]
    Certificate { path: PathBuf, reason: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("could not read response body: {0}")]
    Body(#[source] reqwest::Error),
}

#[derive(Debug, Clone)]
/// Thin wrapper around a `reqwest::Client` configured for one TLS mode.
pub struct ResourceClient {
    http: Client,
}

impl ResourceClient {
    /// Construct a client honoring `tls`.
    ///
    /// A custom authority bundle replaces the built-in trust roots rather than
    /// extending them.
    pub fn new(tls: &TlsVerification) -> Result<Self, ClientError> {
        let mut builder = Client::builder().user_agent(format!("http-resource/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS));

        match tls {
            TlsVerification::Enabled => {}
            TlsVerification::Disabled => {
                debug!("tls certificate verification disabled");
                builder = builder.danger_accept_invalid_certs(true);
            }
            TlsVerification::CustomAuthority(path) => {
                let certificates = load_certificate_bundle(path)?;
                debug!(path = %path.display(), certificates = certificates.len(), "trusting custom certificate authority");
                builder = builder.tls_certs_only(certificates);
            }
        }

        let http = builder.build().map_err(ClientError::Build)?;
        Ok(Self { http })
    }

    /// Send `request` once and return the status and text body.
    pub async fn execute(&self, request: &TransportRequest) -> Result<InvocationResult, ClientError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| ClientError::InvalidRequest(format!("unsupported method '{}'", request.method)))?;

        let mut builder = self.http.request(method, &request.uri);
        for (name, value) in &request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|error| ClientError::InvalidRequest(format!("invalid header name '{name}': {error}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|error| ClientError::InvalidRequest(format!("invalid value for header '{name}': {error}")))?;
            builder = builder.header(header_name, header_value);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder.send().await.map_err(ClientError::Request)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ClientError::Body)?;
        debug!(status, body_len = body.len(), "received response");

        Ok(InvocationResult { status, body })
    }
}

fn load_certificate_bundle(path: &Path) -> Result<Vec<Certificate>, ClientError> {
    let certificate_error = |reason: String| ClientError::Certificate {
        path: path.to_path_buf(),
        reason,
    };

    let pem = fs::read(path).map_err(|error| certificate_error(error.to_string()))?;
    let certificates = Certificate::from_pem_bundle(&pem).map_err(|error| certificate_error(error.to_string()))?;
    if certificates.is_empty() {
        return Err(certificate_error("no PEM certificates found".to_string()));
    }
    Ok(certificates)
}
