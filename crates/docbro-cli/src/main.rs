//! CLI entry point - the composition root.
//!
//! Loads `.env`, parses arguments, installs logging and hands off to the
//! command handlers.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use docbro_cli::{Cli, Commands, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Serve(args) => serve::execute(&args).await,
    }
}
