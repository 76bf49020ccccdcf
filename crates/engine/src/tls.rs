//! Materialization of `ssl_verify` into something the transport can use.
//!
//! Inline certificate-authority text is written once to a uniquely named
//! file and the file is kept: it is never read back by this crate and never
//! deleted, so the path stays valid for the transport and for post-mortem
//! inspection of a failed build.

use std::io::Write;
use std::path::{Path, PathBuf};

use http_resource_types::TlsVerification;
use tracing::debug;

use crate::error::ResourceError;
use crate::request::TlsSetting;

/// File name prefix of written authority bundles.
pub const AUTHORITY_FILE_PREFIX: &str = "ssl-";

/// Resolve `setting` into a transport TLS mode, writing inline authority
/// material into `directory` when needed.
pub fn materialize_tls(setting: &TlsSetting, directory: &Path) -> Result<TlsVerification, ResourceError> {
    match setting {
        TlsSetting::Verify(true) => Ok(TlsVerification::Enabled),
        TlsSetting::Verify(false) => Ok(TlsVerification::Disabled),
        TlsSetting::InlineAuthority(material) => write_authority_file(material, directory).map(TlsVerification::CustomAuthority),
    }
}

fn write_authority_file(material: &str, directory: &Path) -> Result<PathBuf, ResourceError> {
    let context = || format!("could not write certificate authority file in '{}'", directory.display());

    let mut file = tempfile::Builder::new()
        .prefix(AUTHORITY_FILE_PREFIX)
        .suffix(".pem")
        .tempfile_in(directory)
        .map_err(|error| ResourceError::io(context(), error))?;
    file.write_all(material.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|error| ResourceError::io(context(), error))?;
    let (_, path) = file.keep().map_err(|error| ResourceError::io(context(), error.error))?;

    debug!(path = %path.display(), "wrote certificate authority material");
    Ok(path)
}
