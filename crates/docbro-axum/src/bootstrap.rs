//! Axum server bootstrap - the composition root.
//!
//! This module is the only place where the executor, the CLI-backed
//! collaborators and the two services are wired together.

use std::sync::Arc;

use anyhow::{Context, Result};
use docbro_core::security::is_localhost;
use docbro_core::settings::{DEFAULT_ADMIN_PORT, DEFAULT_HOST, DEFAULT_READ_ONLY_PORT};
use docbro_core::{Collaborators, ExecutorSettings, FileAccessController};
use docbro_mcp::{AdminService, ReadOnlyService, ServerRole};
use docbro_runtime::{CliClient, CliProjectCatalog, CliSearch, CliShelfCatalog, CommandExecutor};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::routes::{admin_router, read_only_router};

/// Listen address and role of one server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub role: ServerRole,
}

impl ServerConfig {
    pub fn read_only(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            role: ServerRole::ReadOnly,
        }
    }

    /// Admin config. A non-loopback host is replaced by the loopback
    /// default.
    pub fn admin(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            role: ServerRole::Admin,
        }
        .enforce_loopback()
    }

    #[must_use]
    pub fn enforce_loopback(mut self) -> Self {
        if self.role == ServerRole::Admin && !is_localhost(&self.host) {
            warn!(
                target: "docbro.security",
                requested = %self.host,
                forced = DEFAULT_HOST,
                "Admin server must bind to loopback; overriding host"
            );
            self.host = DEFAULT_HOST.to_string();
        }
        self
    }

    /// `host:port`, bracketing bare IPv6 hosts.
    pub fn addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::read_only(DEFAULT_HOST, DEFAULT_READ_ONLY_PORT)
    }
}

/// Services shared by the two servers.
pub struct DocbroContext {
    pub executor: Arc<CommandExecutor>,
    pub read_only: Arc<ReadOnlyService>,
}

impl DocbroContext {
    /// Admin service reporting the address it is actually served on.
    pub fn admin_service(&self, config: &ServerConfig) -> Arc<AdminService> {
        Arc::new(
            AdminService::new(Arc::clone(&self.read_only), Arc::clone(&self.executor))
                .with_bind(config.host.clone(), config.port),
        )
    }
}

/// Wire the executor and the CLI-backed collaborators.
pub fn bootstrap(settings: ExecutorSettings) -> DocbroContext {
    info!(
        target: "docbro.server",
        cli_path = %settings.cli_path.display(),
        default_timeout_secs = settings.default_timeout_secs,
        "Bootstrapping DocBro MCP services"
    );

    let executor = Arc::new(CommandExecutor::new(settings));
    let client = CliClient::new(Arc::clone(&executor));
    let collaborators = Collaborators::new(
        Arc::new(CliProjectCatalog::new(client.clone())),
        Arc::new(CliSearch::new(client.clone())),
        Arc::new(CliShelfCatalog::new(client)),
    );
    let read_only = Arc::new(ReadOnlyService::new(
        collaborators,
        FileAccessController::new(),
    ));

    DocbroContext {
        executor,
        read_only,
    }
}

/// Bind and serve one server until Ctrl-C.
pub async fn start_server(ctx: &DocbroContext, config: ServerConfig) -> Result<()> {
    let config = config.enforce_loopback();
    let app = match config.role {
        ServerRole::ReadOnly => read_only_router(Arc::clone(&ctx.read_only)),
        ServerRole::Admin => admin_router(ctx.admin_service(&config)),
    };

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {} server to {addr}", config.role))?;

    info!(
        target: "docbro.server",
        role = %config.role,
        addr = %addr,
        localhost_only = is_localhost(&config.host),
        "DocBro MCP server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| format!("{} server failed", config.role))?;

    info!(target: "docbro.server", role = %config.role, "Server stopped");
    Ok(())
}

/// Default admin config.
pub fn default_admin_config() -> ServerConfig {
    ServerConfig::admin(DEFAULT_HOST, DEFAULT_ADMIN_PORT)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }
}
