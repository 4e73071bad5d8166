//! Subcommands and their arguments.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use docbro_core::settings::{
    DEFAULT_ADMIN_PORT, DEFAULT_CLI_PATH, DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_HOST,
    DEFAULT_READ_ONLY_PORT,
};
use docbro_core::{ExecutorSettings, SettingsError, validate_settings};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the read-only server, the admin server, or both
    Serve(ServeArgs),
}

/// Which servers a `serve` invocation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeMode {
    ReadOnly,
    Admin,
    Both,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Start only the read-only server
    #[arg(long, conflicts_with_all = ["admin", "both"])]
    pub read_only: bool,

    /// Start only the admin server (always bound to loopback)
    #[arg(long, conflicts_with = "both")]
    pub admin: bool,

    /// Start both servers (default)
    #[arg(long)]
    pub both: bool,

    /// Host for the read-only server
    #[arg(long, env = "DOCBRO_MCP_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port for the read-only server
    #[arg(long, env = "DOCBRO_MCP_PORT", default_value_t = DEFAULT_READ_ONLY_PORT)]
    pub port: u16,

    /// Port for the admin server
    #[arg(long, env = "DOCBRO_MCP_ADMIN_PORT", default_value_t = DEFAULT_ADMIN_PORT)]
    pub admin_port: u16,

    /// Path to the DocBro CLI executable
    #[arg(long, env = "DOCBRO_CLI_PATH", default_value = DEFAULT_CLI_PATH)]
    pub cli_path: PathBuf,

    /// Default command timeout in seconds (1-300)
    #[arg(
        long = "default-timeout",
        env = "DOCBRO_COMMAND_TIMEOUT",
        default_value_t = DEFAULT_COMMAND_TIMEOUT_SECS
    )]
    pub default_timeout: u64,
}

impl ServeArgs {
    pub const fn mode(&self) -> ServeMode {
        if self.read_only {
            ServeMode::ReadOnly
        } else if self.admin {
            ServeMode::Admin
        } else {
            ServeMode::Both
        }
    }

    /// Validated executor settings for this invocation.
    pub fn executor_settings(&self) -> Result<ExecutorSettings, SettingsError> {
        let settings = ExecutorSettings::with_defaults()
            .with_cli_path(self.cli_path.clone())
            .with_default_timeout(self.default_timeout);
        validate_settings(&settings)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::parser::Cli;

    fn serve_args(argv: &[&str]) -> ServeArgs {
        let mut full = vec!["docbro-mcp", "serve"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Some(Commands::Serve(args)) => args,
            None => panic!("expected serve"),
        }
    }

    #[test]
    fn mode_defaults_to_both() {
        assert_eq!(serve_args(&[]).mode(), ServeMode::Both);
        assert_eq!(serve_args(&["--read-only"]).mode(), ServeMode::ReadOnly);
        assert_eq!(serve_args(&["--admin"]).mode(), ServeMode::Admin);
        assert_eq!(serve_args(&["--both"]).mode(), ServeMode::Both);
    }

    #[test]
    fn mode_flags_conflict() {
        let parsed = Cli::try_parse_from(["docbro-mcp", "serve", "--read-only", "--admin"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn explicit_flags_are_parsed() {
        let args = serve_args(&[
            "--host",
            "0.0.0.0",
            "--port",
            "8000",
            "--admin-port",
            "8001",
            "--cli-path",
            "/opt/docbro/bin/docbro",
            "--default-timeout",
            "60",
        ]);
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.port, 8000);
        assert_eq!(args.admin_port, 8001);

        let settings = args.executor_settings().unwrap();
        assert_eq!(settings.cli_path, PathBuf::from("/opt/docbro/bin/docbro"));
        assert_eq!(settings.default_timeout_secs, 60);
    }

    #[test]
    fn timeout_outside_bounds_is_rejected() {
        for timeout in ["0", "301"] {
            let args = serve_args(&["--default-timeout", timeout]);
            assert!(matches!(
                args.executor_settings(),
                Err(SettingsError::TimeoutOutOfRange(_))
            ));
        }
    }

    #[test]
    fn empty_cli_path_is_rejected() {
        let parsed = Cli::try_parse_from(["docbro-mcp", "serve", "--cli-path", ""]);
        assert!(parsed.is_err());
    }
}
