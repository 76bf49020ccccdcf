//! Shared type definitions for the HTTP resource.
//!
//! These types carry data between the interpolation, request derivation,
//! transport, and output stages. They hold no behavior beyond small
//! conversions so every crate in the workspace can depend on them cheaply.

use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A resolved or unresolved `source`/`params` mapping.
pub type Configuration = Map<String, Value>;

/// The lifecycle verb the orchestrator invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Discover new versions.
    Check,
    /// Fetch a version into a destination directory.
    In,
    /// Push to the remote.
    Out,
}

impl Verb {
    pub const ALL: [Verb; 3] = [Verb::Check, Verb::In, Verb::Out];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Check => "check",
            Verb::In => "in",
            Verb::Out => "out",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verb::ALL
            .into_iter()
            .find(|verb| verb.as_str() == s)
            .ok_or_else(|| format!("unknown verb '{s}'; expected one of check, in, out"))
    }
}

/// One `{name, value}` pair in the output envelope's metadata list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub name: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The protocol result written to stdout after a successful invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputEnvelope {
    /// Opaque version mapping. Always empty: this resource does not track versions.
    pub version: Map<String, Value>,
    pub metadata: Vec<MetadataEntry>,
}

impl OutputEnvelope {
    /// Look up a metadata value by entry name.
    pub fn metadata_value(&self, name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value.as_str())
    }
}

/// How the transport verifies the server's TLS certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsVerification {
    /// Verify against the platform trust store.
    Enabled,
    /// Accept any certificate.
    Disabled,
    /// Verify against the PEM bundle stored at this path, and only against it.
    CustomAuthority(PathBuf),
}

/// The request payload, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// Form-encoded fields, each value already rendered as JSON text.
    Form(Vec<(String, String)>),
}

/// Everything the transport needs to issue exactly one request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: String,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    pub tls: TlsVerification,
}

/// The status and text body returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    pub status: u16,
    pub body: String,
}
