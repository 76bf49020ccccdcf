//! Tracing subscriber setup.
//!
//! stdout carries only the output envelope, so every layer writes to stderr
//! or to the debug log file.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// File name prefix of the debug log written outside debug mode.
pub const LOG_FILE_PREFIX: &str = "log";

/// Install the subscriber for this invocation.
///
/// In debug mode everything at DEBUG goes to stderr. Otherwise DEBUG goes to
/// a new log file in `log_dir`, whose path is returned, and INFO to stderr.
/// `RUST_LOG` overrides the stderr level in both cases.
pub fn init_tracing(debug: bool, log_dir: &Path) -> Result<Option<PathBuf>> {
    if debug {
        init_console(LevelFilter::DEBUG);
        return Ok(None);
    }

    let (file, path) = create_log_file(log_dir)?;
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG),
        )
        .with(fmt::layer().with_writer(io::stderr).with_filter(stderr_filter(LevelFilter::INFO)))
        .try_init();
    Ok(Some(path))
}

/// Stderr-only subscriber, also used when the log file cannot be created.
pub fn init_console(level: LevelFilter) {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_filter(stderr_filter(level)))
        .try_init();
}

fn stderr_filter(default_level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

fn create_log_file(log_dir: &Path) -> Result<(File, PathBuf)> {
    fs::create_dir_all(log_dir).with_context(|| format!("could not create log directory '{}'", log_dir.display()))?;
    let file = tempfile::Builder::new()
        .prefix(LOG_FILE_PREFIX)
        .suffix(".log")
        .tempfile_in(log_dir)
        .with_context(|| format!("could not create log file in '{}'", log_dir.display()))?;
    Ok(file.keep()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_kept_in_requested_directory() {
        let directory = tempfile::tempdir().unwrap();
        let nested = directory.path().join("logs");

        let (_file, path) = create_log_file(&nested).unwrap();

        assert!(path.exists());
        assert!(path.starts_with(&nested));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(LOG_FILE_PREFIX));
        assert!(name.ends_with(".log"));
    }
}
