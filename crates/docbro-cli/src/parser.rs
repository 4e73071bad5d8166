//! Root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Launcher for the DocBro MCP servers.
#[derive(Debug, Parser)]
#[command(name = "docbro-mcp")]
#[command(about = "Serve DocBro documentation to MCP clients")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Filter used when `RUST_LOG` is absent.
    pub const fn default_log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::parse_from(["docbro-mcp", "serve", "--verbose"]);
        assert!(cli.verbose);
        assert_eq!(cli.default_log_filter(), "debug");

        let quiet = Cli::parse_from(["docbro-mcp"]);
        assert!(quiet.command.is_none());
        assert_eq!(quiet.default_log_filter(), "info");
    }
}
