//! Process settings resolved once from the environment.

use std::env;
use std::path::PathBuf;

use http_resource_engine::OutputMode;
use http_resource_util::env_flag_enabled;

/// Non-empty value switches logging to DEBUG on stderr.
pub const DEBUG_ENV: &str = "RESOURCE_DEBUG";
/// Non-empty value merges the decoded response body into the output.
pub const TEST_MODE_ENV: &str = "TEST";
/// Directory for the debug log file and input dumps. Defaults to the system temp dir.
pub const LOG_DIR_ENV: &str = "RESOURCE_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub debug: bool,
    pub output_mode: OutputMode,
    pub log_dir: PathBuf,
}

impl RuntimeSettings {
    pub fn from_environment() -> Self {
        let output_mode = if env_flag_enabled(TEST_MODE_ENV) {
            OutputMode::TestObservation
        } else {
            OutputMode::Production
        };

        Self {
            debug: env_flag_enabled(DEBUG_ENV),
            output_mode,
            log_dir: resolve_log_dir(),
        }
    }
}

fn resolve_log_dir() -> PathBuf {
    env::var_os(LOG_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment() {
        temp_env::with_vars_unset([DEBUG_ENV, TEST_MODE_ENV, LOG_DIR_ENV], || {
            let settings = RuntimeSettings::from_environment();
            assert!(!settings.debug);
            assert_eq!(settings.output_mode, OutputMode::Production);
            assert_eq!(settings.log_dir, env::temp_dir());
        });
    }

    #[test]
    fn environment_overrides_apply() {
        temp_env::with_vars(
            [
                (DEBUG_ENV, Some("1")),
                (TEST_MODE_ENV, Some("true")),
                (LOG_DIR_ENV, Some("/var/log/resource")),
            ],
            || {
                let settings = RuntimeSettings::from_environment();
                assert!(settings.debug);
                assert_eq!(settings.output_mode, OutputMode::TestObservation);
                assert_eq!(settings.log_dir, PathBuf::from("/var/log/resource"));
            },
        );
    }

    #[test]
    fn empty_values_count_as_unset() {
        temp_env::with_vars([(DEBUG_ENV, Some("")), (TEST_MODE_ENV, Some("")), (LOG_DIR_ENV, Some(""))], || {
            let settings = RuntimeSettings::from_environment();
            assert!(!settings.debug);
            assert_eq!(settings.output_mode, OutputMode::Production);
            assert_eq!(settings.log_dir, env::temp_dir());
        });
    }
}
