//! `serve` command handler.

use anyhow::{Context, Result};
use docbro_axum::{ServerConfig, bootstrap, start_server};
use tracing::info;

use crate::commands::{ServeArgs, ServeMode};

fn read_only_config(args: &ServeArgs) -> ServerConfig {
    ServerConfig::read_only(args.host.clone(), args.port)
}

fn admin_config(args: &ServeArgs) -> ServerConfig {
    ServerConfig::admin(args.host.clone(), args.admin_port)
}

/// Server configs a `serve` invocation starts, read-only first.
pub fn server_configs(args: &ServeArgs) -> Vec<ServerConfig> {
    match args.mode() {
        ServeMode::ReadOnly => vec![read_only_config(args)],
        ServeMode::Admin => vec![admin_config(args)],
        ServeMode::Both => vec![read_only_config(args), admin_config(args)],
    }
}

pub async fn execute(args: &ServeArgs) -> Result<()> {
    let settings = args
        .executor_settings()
        .context("Invalid executor settings")?;
    let ctx = bootstrap(settings);
    info!(mode = ?args.mode(), "Starting DocBro MCP");

    match args.mode() {
        ServeMode::ReadOnly => start_server(&ctx, read_only_config(args)).await,
        ServeMode::Admin => start_server(&ctx, admin_config(args)).await,
        ServeMode::Both => {
            tokio::try_join!(
                start_server(&ctx, read_only_config(args)),
                start_server(&ctx, admin_config(args))
            )?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::{Cli, Commands};

    fn configs(argv: &[&str]) -> Vec<ServerConfig> {
        let mut full = vec!["docbro-mcp", "serve"];
        full.extend_from_slice(argv);
        let Some(Commands::Serve(args)) = Cli::parse_from(full).command else {
            panic!("expected serve");
        };
        server_configs(&args)
    }

    #[test]
    fn both_servers_by_default() {
        let addrs: Vec<String> = configs(&[]).iter().map(ServerConfig::addr).collect();
        assert_eq!(addrs, ["127.0.0.1:9383", "127.0.0.1:9384"]);
    }

    #[test]
    fn public_host_only_applies_to_read_only() {
        let both = configs(&["--host", "0.0.0.0"]);
        assert_eq!(both[0].host, "0.0.0.0");
        assert_eq!(both[1].host, "127.0.0.1");

        let admin = configs(&["--admin", "--host", "10.0.0.2", "--admin-port", "9500"]);
        assert_eq!(admin.len(), 1);
        assert_eq!(admin[0].addr(), "127.0.0.1:9500");
    }

    #[test]
    fn read_only_mode_starts_one_server() {
        let configs = configs(&["--read-only", "--port", "7000"]);
        assert_eq!(configs, [ServerConfig::read_only("127.0.0.1", 7000)]);
    }
}
