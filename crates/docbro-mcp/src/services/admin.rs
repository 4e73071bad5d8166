//! Mutating capabilities, layered on top of the read-only service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use docbro_core::security::is_localhost;
use docbro_core::settings::{DEFAULT_ADMIN_PORT, DEFAULT_HOST, MAX_COMMAND_TIMEOUT_SECS};
use docbro_core::{CommandExecutionSpec, CoreError, ExecutionResult, McpResponse, McpTool};
use docbro_runtime::{CliInvocation, CommandExecutor};
use serde_json::{Value, json};
use tracing::{info, warn};

use super::ReadOnlyService;
use super::args::{
    BoxCreateArgs, BoxShelfArgs, CrawlArgs, FillArgs, ProjectCreateArgs, ProjectRemoveArgs,
    ShelfCreateArgs, ShelfNameArgs, check_name, check_optional_name, check_text, parse_args,
};
use crate::registry::{self, tool_names as t};
use crate::service::{
    CapabilityService, ResourceContents, ResourceListing, ServerRole, ToolCallError,
    into_tool_result,
};

/// Timeout for crawl and fill, which routinely outlast the default.
const LONG_RUNNING_TIMEOUT: Duration = Duration::from_secs(MAX_COMMAND_TIMEOUT_SECS);

pub struct AdminService {
    read_only: Arc<ReadOnlyService>,
    executor: Arc<CommandExecutor>,
    tools: Vec<McpTool>,
    bind_host: String,
    port: u16,
}

impl AdminService {
    pub fn new(read_only: Arc<ReadOnlyService>, executor: Arc<CommandExecutor>) -> Self {
        Self {
            read_only,
            executor,
            tools: registry::admin_tools(),
            bind_host: DEFAULT_HOST.to_string(),
            port: DEFAULT_ADMIN_PORT,
        }
    }

    /// Record the address the admin server listens on, for health reports.
    #[must_use]
    pub fn with_bind(mut self, host: impl Into<String>, port: u16) -> Self {
        self.bind_host = host.into();
        self.port = port;
        self
    }

    pub const fn read_only(&self) -> &Arc<ReadOnlyService> {
        &self.read_only
    }

    fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.executor.settings().default_timeout_secs)
    }

    /// Run an allow-listed CLI command on behalf of the caller.
    ///
    /// Bad requests and blocked patterns are errors; a command that ran and
    /// exited non-zero is an error envelope carrying the execution data.
    pub async fn execute_command(
        &self,
        spec: CommandExecutionSpec,
    ) -> Result<McpResponse, CoreError> {
        let mut request = spec.into_request(self.executor.settings().default_timeout_secs)?;
        self.executor
            .try_validate(&mut request)
            .map_err(|rejection| CoreError::Security(rejection.to_string()))?;

        let result = self.executor.execute(&mut request).await;
        let data = json!({
            "command": request.command().as_str(),
            "arguments": request.arguments(),
            "exit_code": result.exit_code,
            "stdout": result.stdout,
            "stderr": result.stderr,
            "execution_time_ms": result.execution_time_ms,
            "state": request.state(),
        });
        let metadata = json!({
            "exit_code": result.exit_code,
            "execution_time_ms": result.execution_time_ms,
        });

        if result.succeeded() {
            Ok(McpResponse::success(data).with_metadata(metadata))
        } else {
            Ok(McpResponse::error_with_data(failure_message(&result), data).with_metadata(metadata))
        }
    }

    pub async fn project_create(&self, args: &ProjectCreateArgs) -> Result<McpResponse, CoreError> {
        check_name("project", &args.name)?;
        if let Some(description) = &args.description {
            check_text("description", description)?;
        }
        let invocation = CliInvocation::new(
            ["project", "--create", args.name.as_str(), "--type", args.project_type.as_str()],
            self.default_timeout(),
        )
        .with_flag("--description", args.description.as_deref());
        self.run_cli(&invocation).await
    }

    pub async fn project_remove(&self, args: &ProjectRemoveArgs) -> Result<McpResponse, CoreError> {
        check_name("project", &args.name)?;
        let invocation = CliInvocation::new(
            ["project", "--remove", args.name.as_str()],
            self.default_timeout(),
        )
        .with_switch("--confirm", args.confirm);
        self.run_cli(&invocation).await
    }

    pub async fn crawl_project(&self, args: &CrawlArgs) -> Result<McpResponse, CoreError> {
        check_name("project", &args.name)?;
        args.limits.validate()?;
        let invocation = args.limits.apply(CliInvocation::new(
            ["crawl", args.name.as_str()],
            LONG_RUNNING_TIMEOUT,
        ));
        self.run_cli(&invocation).await
    }

    pub async fn create_shelf(&self, args: &ShelfCreateArgs) -> Result<McpResponse, CoreError> {
        check_name("shelf", &args.name)?;
        if let Some(description) = &args.description {
            check_text("description", description)?;
        }
        let invocation = CliInvocation::new(
            ["shelf", "create", args.name.as_str()],
            self.default_timeout(),
        )
        .with_flag("--description", args.description.as_deref())
        .with_switch("--set-current", args.set_current);
        self.run_cli(&invocation).await
    }

    pub async fn set_current_shelf(&self, args: &ShelfNameArgs) -> Result<McpResponse, CoreError> {
        check_name("shelf", &args.shelf_name)?;
        let invocation = CliInvocation::new(
            ["shelf", "current", args.shelf_name.as_str()],
            self.default_timeout(),
        );
        self.run_cli(&invocation).await
    }

    pub async fn create_box(&self, args: &BoxCreateArgs) -> Result<McpResponse, CoreError> {
        check_name("box", &args.name)?;
        check_optional_name("shelf", args.shelf.as_deref())?;
        if let Some(description) = &args.description {
            check_text("description", description)?;
        }
        let invocation = CliInvocation::new(
            ["box", "create", args.name.as_str(), "--type", args.box_type.as_str()],
            self.default_timeout(),
        )
        .with_flag("--shelf", args.shelf.as_deref())
        .with_flag("--description", args.description.as_deref());
        self.run_cli(&invocation).await
    }

    /// Add a box to a shelf.
    pub async fn add_basket(&self, args: &BoxShelfArgs) -> Result<McpResponse, CoreError> {
        check_name("box", &args.box_name)?;
        check_name("shelf", &args.shelf_name)?;
        let invocation = CliInvocation::new(
            ["box", "add", args.box_name.as_str(), "--to-shelf", args.shelf_name.as_str()],
            self.default_timeout(),
        );
        self.run_cli(&invocation).await
    }

    /// Remove a box from a shelf. The box itself survives.
    pub async fn remove_basket(&self, args: &BoxShelfArgs) -> Result<McpResponse, CoreError> {
        check_name("box", &args.box_name)?;
        check_name("shelf", &args.shelf_name)?;
        let invocation = CliInvocation::new(
            ["box", "remove", args.box_name.as_str(), "--from-shelf", args.shelf_name.as_str()],
            self.default_timeout(),
        );
        self.run_cli(&invocation).await
    }

    pub async fn fill_box(&self, args: &FillArgs) -> Result<McpResponse, CoreError> {
        check_name("box", &args.box_name)?;
        check_text("source", &args.source)?;
        check_optional_name("shelf", args.shelf.as_deref())?;
        args.limits.validate()?;
        let invocation = CliInvocation::new(
            ["fill", args.box_name.as_str(), "--source", args.source.as_str()],
            LONG_RUNNING_TIMEOUT,
        )
        .with_flag("--shelf", args.shelf.as_deref());
        self.run_cli(&args.limits.apply(invocation)).await
    }

    /// Shelf deletion is only available through the CLI itself.
    pub fn delete_shelf(&self) -> Result<McpResponse, CoreError> {
        warn!(target: "docbro.security", "Refused shelf deletion");
        Err(CoreError::Prohibited)
    }

    pub fn health(&self) -> McpResponse {
        McpResponse::success(json!({
            "server_type": ServerRole::Admin.as_str(),
            "status": "healthy",
            "security_status": {
                "localhost_only": is_localhost(&self.bind_host),
                "port": self.port,
            },
        }))
    }

    async fn run_cli(&self, invocation: &CliInvocation) -> Result<McpResponse, CoreError> {
        let result = self
            .executor
            .run_invocation(invocation)
            .await
            .map_err(|rejection| CoreError::Security(rejection.to_string()))?;
        info!(
            invocation = %invocation.display(),
            exit_code = result.exit_code,
            "Admin operation finished"
        );

        let metadata = json!({
            "exit_code": result.exit_code,
            "execution_time_ms": result.execution_time_ms,
        });
        if result.succeeded() {
            Ok(McpResponse::success(json!({ "output": result.stdout.trim() }))
                .with_metadata(metadata))
        } else {
            let data = json!({ "stdout": result.stdout, "stderr": result.stderr });
            Ok(McpResponse::error_with_data(failure_message(&result), data).with_metadata(metadata))
        }
    }

    async fn call_admin_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Option<Result<McpResponse, CoreError>> {
        let result = match name {
            t::EXECUTE_COMMAND => match parse_args::<CommandExecutionSpec>(arguments) {
                Ok(spec) => self.execute_command(spec).await,
                Err(e) => Err(e),
            },
            t::PROJECT_CREATE => match parse_args::<ProjectCreateArgs>(arguments) {
                Ok(args) => self.project_create(&args).await,
                Err(e) => Err(e),
            },
            t::PROJECT_REMOVE => match parse_args::<ProjectRemoveArgs>(arguments) {
                Ok(args) => self.project_remove(&args).await,
                Err(e) => Err(e),
            },
            t::CRAWL => match parse_args::<CrawlArgs>(arguments) {
                Ok(args) => self.crawl_project(&args).await,
                Err(e) => Err(e),
            },
            t::SHELF_CREATE => match parse_args::<ShelfCreateArgs>(arguments) {
                Ok(args) => self.create_shelf(&args).await,
                Err(e) => Err(e),
            },
            t::SHELF_SET_CURRENT => match parse_args::<ShelfNameArgs>(arguments) {
                Ok(args) => self.set_current_shelf(&args).await,
                Err(e) => Err(e),
            },
            t::BOX_CREATE => match parse_args::<BoxCreateArgs>(arguments) {
                Ok(args) => self.create_box(&args).await,
                Err(e) => Err(e),
            },
            t::BOX_ADD => match parse_args::<BoxShelfArgs>(arguments) {
                Ok(args) => self.add_basket(&args).await,
                Err(e) => Err(e),
            },
            t::BOX_REMOVE => match parse_args::<BoxShelfArgs>(arguments) {
                Ok(args) => self.remove_basket(&args).await,
                Err(e) => Err(e),
            },
            t::FILL => match parse_args::<FillArgs>(arguments) {
                Ok(args) => self.fill_box(&args).await,
                Err(e) => Err(e),
            },
            t::SHELF_DELETE => self.delete_shelf(),
            _ => return None,
        };
        Some(result)
    }
}

fn failure_message(result: &ExecutionResult) -> String {
    let stderr = result.stderr.trim();
    if stderr.is_empty() {
        format!("Command exited with code {}", result.exit_code)
    } else {
        stderr.to_string()
    }
}

#[async_trait]
impl CapabilityService for AdminService {
    fn role(&self) -> ServerRole {
        ServerRole::Admin
    }

    fn list_tools(&self) -> &[McpTool] {
        &self.tools
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<McpResponse, ToolCallError> {
        if let Some(result) = self.read_only.call_read_tool(name, arguments.clone()).await {
            return into_tool_result(result);
        }
        match self.call_admin_tool(name, arguments).await {
            Some(result) => into_tool_result(result),
            None => Err(ToolCallError::UnknownTool(name.to_string())),
        }
    }

    async fn list_resources(&self) -> ResourceListing {
        self.read_only.resource_listing().await
    }

    async fn read_resource(&self, uri: &str) -> Result<ResourceContents, CoreError> {
        self.read_only.resource_contents(uri).await
    }
}
