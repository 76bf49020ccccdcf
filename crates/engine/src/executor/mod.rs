//! Execution of one resource invocation.
//!
//! - [`transport`]: the [`Transport`] seam and its HTTP implementation
//! - [`runner`]: [`ResourceRunner`], which drives merge, interpolation,
//!   request derivation, the call, and status classification

pub mod runner;
pub mod transport;

pub use runner::{InvocationOutcome, ResourceRunner, classify};
pub use transport::{HttpTransport, Transport};
