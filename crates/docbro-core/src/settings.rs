//! Default settings for the DocBro MCP servers.
//!
//! Pure values with no infrastructure dependencies. The CLI and the axum
//! bootstrap read these when no explicit configuration is supplied.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Default bind host for both servers.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port for the read-only server.
pub const DEFAULT_READ_ONLY_PORT: u16 = 9383;

/// Default port for the admin server.
pub const DEFAULT_ADMIN_PORT: u16 = 9384;

/// Default name of the DocBro CLI executable, resolved through `PATH`.
pub const DEFAULT_CLI_PATH: &str = "docbro";

/// Command timeout used when a request does not specify one.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

/// Lower bound for a command timeout.
pub const MIN_COMMAND_TIMEOUT_SECS: u64 = 1;

/// Upper bound for a command timeout.
pub const MAX_COMMAND_TIMEOUT_SECS: u64 = 300;

/// Settings for the command executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorSettings {
    /// Path (or bare name) of the DocBro CLI executable.
    pub cli_path: PathBuf,

    /// Timeout applied when a request does not carry one.
    pub default_timeout_secs: u64,
}

impl ExecutorSettings {
    /// Create settings with the defaults above.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            cli_path: PathBuf::from(DEFAULT_CLI_PATH),
            default_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }

    /// Override the CLI path.
    #[must_use]
    pub fn with_cli_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cli_path = path.into();
        self
    }

    /// Override the default timeout.
    #[must_use]
    pub const fn with_default_timeout(mut self, secs: u64) -> Self {
        self.default_timeout_secs = secs;
        self
    }
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Errors produced when validating settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("CLI path must not be empty")]
    EmptyCliPath,

    #[error("default timeout must be between 1 and 300 seconds, got {0}")]
    TimeoutOutOfRange(u64),
}

/// Validate executor settings before they are handed to the runtime.
pub fn validate_settings(settings: &ExecutorSettings) -> Result<(), SettingsError> {
    if settings.cli_path.as_os_str().is_empty() {
        return Err(SettingsError::EmptyCliPath);
    }
    if !(MIN_COMMAND_TIMEOUT_SECS..=MAX_COMMAND_TIMEOUT_SECS)
        .contains(&settings.default_timeout_secs)
    {
        return Err(SettingsError::TimeoutOutOfRange(settings.default_timeout_secs));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = ExecutorSettings::with_defaults();
        assert_eq!(settings.cli_path, PathBuf::from("docbro"));
        assert_eq!(settings.default_timeout_secs, 30);
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn rejects_out_of_range_timeout() {
        let settings = ExecutorSettings::with_defaults().with_default_timeout(0);
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::TimeoutOutOfRange(0))
        );

        let settings = ExecutorSettings::with_defaults().with_default_timeout(301);
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn rejects_empty_cli_path() {
        let settings = ExecutorSettings::with_defaults().with_cli_path("");
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyCliPath)
        );
    }
}
