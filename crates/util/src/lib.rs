//! Utilities shared by the HTTP resource crates: placeholder interpolation,
//! redaction and truncation for logs and metadata, and JSON text rendering.

pub mod env_flags;
pub mod interpolation;
pub mod json_text;
pub mod text_processing;

pub use env_flags::{env_flag_enabled, is_truthy_json};
pub use interpolation::{
    EXTERNAL_URL_ENV_VAR, InterpolationError, SUBSTITUTION_ENV_PREFIX, SubstitutionDictionary, interpolate, substitute,
};
pub use json_text::to_spaced_ascii_json;
pub use text_processing::{redact_json, redact_sensitive, truncate_with_marker};
