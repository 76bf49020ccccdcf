//! # HTTP Resource Engine
//!
//! Turns a CI resource payload into one HTTP request and its output envelope.
//!
//! The flow for every verb is the same:
//!
//! 1. [`ResourceInput::parse`] reads `{"source": ..., "params": ...}`
//! 2. `params` is overlaid on `source`
//! 3. `{name}` placeholders are filled from the build environment and the
//!    merged parameters
//! 4. [`RequestSpec`] derives method, URI, headers, body, TLS mode, and the
//!    accepted status codes
//! 5. a [`Transport`] sends the request once
//! 6. the status is checked and an [`OutputEnvelope`](http_resource_types::OutputEnvelope)
//!    is built
//!
//! ## Usage
//!
//! ```rust,no_run
//! use http_resource_engine::{HttpTransport, ResourceInput, ResourceRunner};
//! use http_resource_types::Verb;
//! use http_resource_util::SubstitutionDictionary;
//!
//! # async fn run() -> Result<(), http_resource_engine::ResourceError> {
//! let input = ResourceInput::parse(r#"{"source": {"uri": "https://example.com/hook"}}"#)?;
//! let runner = ResourceRunner::new(HttpTransport, SubstitutionDictionary::from_environment());
//! let outcome = runner.run(Verb::Out, &input).await?;
//! println!("{}", serde_json::to_string(&outcome.envelope)?);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod executor;
pub mod input;
pub mod output;
pub mod request;
pub mod tls;

pub use error::ResourceError;
pub use executor::{HttpTransport, InvocationOutcome, ResourceRunner, Transport};
pub use input::ResourceInput;
pub use output::{OutputMode, build_envelope, render_output};
pub use request::{AcceptedStatuses, RequestSpec, TlsSetting};
