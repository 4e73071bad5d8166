//! Command execution domain types.
//!
//! A [`CommandExecutionRequest`] describes one allow-listed DocBro CLI
//! invocation and carries its own [`CommandState`] machine. The executor in
//! `docbro-runtime` drives the state; this module only enforces which
//! transitions are legal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::settings::{
    DEFAULT_COMMAND_TIMEOUT_SECS, MAX_COMMAND_TIMEOUT_SECS, MIN_COMMAND_TIMEOUT_SECS,
};

/// CLI commands callers may execute.
///
/// `serve` is absent: a server never spawns another server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CliCommand {
    Project,
    Crawl,
    Setup,
    Health,
    Upload,
}

impl CliCommand {
    /// Every allow-listed command.
    pub const ALL: [Self; 5] = [
        Self::Project,
        Self::Crawl,
        Self::Setup,
        Self::Health,
        Self::Upload,
    ];

    /// The CLI subcommand name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Crawl => "crawl",
            Self::Setup => "setup",
            Self::Health => "health",
            Self::Upload => "upload",
        }
    }
}

impl fmt::Display for CliCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CliCommand {
    type Err = CommandRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == normalized)
            .ok_or_else(|| {
                if normalized == "serve" {
                    CommandRequestError::RecursiveServe
                } else {
                    CommandRequestError::NotAllowed(s.to_string())
                }
            })
    }
}

/// A primitive option value passed through to the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl OptionValue {
    /// Render as a CLI flag: `--key` for `true`, nothing for `false`,
    /// `--key=value` otherwise.
    pub fn render(&self, key: &str) -> Option<String> {
        let flag = key.trim_start_matches('-').replace('_', "-");
        match self {
            Self::Bool(true) => Some(format!("--{flag}")),
            Self::Bool(false) => None,
            Self::Int(v) => Some(format!("--{flag}={v}")),
            Self::Float(v) => Some(format!("--{flag}={v}")),
            Self::String(v) => Some(format!("--{flag}={v}")),
        }
    }

    /// The string payload, if this is a string option.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Pass-through CLI options. Ordered so the rendered command line is stable.
pub type CommandOptions = BTreeMap<String, OptionValue>;

/// Lifecycle of a command execution request.
///
/// ```text
/// CREATED -> VALIDATED -> EXECUTING -> COMPLETED
///                                  \-> FAILED
/// CREATED -> FAILED
/// VALIDATED -> FAILED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandState {
    Created,
    Validated,
    Executing,
    Completed,
    Failed,
}

impl CommandState {
    /// Every state, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Created,
        Self::Validated,
        Self::Executing,
        Self::Completed,
        Self::Failed,
    ];

    /// Whether `self -> next` appears in the transition table.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Validated)
                | (Self::Created, Self::Failed)
                | (Self::Validated, Self::Executing)
                | (Self::Validated, Self::Failed)
                | (Self::Executing, Self::Completed)
                | (Self::Executing, Self::Failed)
        )
    }

    /// Terminal states accept no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Validated => "VALIDATED",
            Self::Executing => "EXECUTING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected state transition. The request state is left unchanged.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("invalid state transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: CommandState,
    pub to: CommandState,
}

/// Errors raised while constructing a [`CommandExecutionRequest`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandRequestError {
    #[error("the 'serve' command cannot be executed from the MCP server")]
    RecursiveServe,

    #[error("command '{0}' is not allowed (allowed: project, crawl, setup, health, upload)")]
    NotAllowed(String),

    #[error("timeout must be between 1 and 300 seconds, got {0}")]
    TimeoutOutOfRange(u64),

    #[error("invalid option name '{0}'")]
    InvalidOptionKey(String),
}

/// One allow-listed CLI invocation and its state.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandExecutionRequest {
    command: CliCommand,
    arguments: Vec<String>,
    options: CommandOptions,
    timeout_secs: u64,
    state: CommandState,
}

impl CommandExecutionRequest {
    /// Create a request in the `CREATED` state.
    ///
    /// Argument contents are not checked here; that is the executor's
    /// validation step, which moves the request to `FAILED` instead of
    /// returning an error.
    pub fn new(
        command: CliCommand,
        arguments: Vec<String>,
        options: CommandOptions,
        timeout_secs: u64,
    ) -> Result<Self, CommandRequestError> {
        if !(MIN_COMMAND_TIMEOUT_SECS..=MAX_COMMAND_TIMEOUT_SECS).contains(&timeout_secs) {
            return Err(CommandRequestError::TimeoutOutOfRange(timeout_secs));
        }
        if let Some(bad) = options.keys().find(|k| !is_valid_option_key(k)) {
            return Err(CommandRequestError::InvalidOptionKey(bad.clone()));
        }
        Ok(Self {
            command,
            arguments,
            options,
            timeout_secs,
            state: CommandState::Created,
        })
    }

    pub const fn command(&self) -> CliCommand {
        self.command
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub const fn options(&self) -> &CommandOptions {
        &self.options
    }

    pub const fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub const fn state(&self) -> CommandState {
        self.state
    }

    /// Move to `next` if the transition table allows it.
    pub fn advance(&mut self, next: CommandState) -> Result<(), InvalidTransition> {
        if self.state.can_transition_to(next) {
            self.state = next;
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self.state,
                to: next,
            })
        }
    }

    /// Move to `FAILED` when legal; terminal requests are left as they are.
    pub fn mark_failed(&mut self) {
        let _ = self.advance(CommandState::Failed);
    }

    /// Options rendered as CLI flags, in key order.
    pub fn rendered_options(&self) -> Vec<String> {
        self.options
            .iter()
            .filter_map(|(key, value)| value.render(key))
            .collect()
    }

    /// Full argument vector after the executable: command, arguments, options.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(1 + self.arguments.len() + self.options.len());
        argv.push(self.command.as_str().to_string());
        argv.extend(self.arguments.iter().cloned());
        argv.extend(self.rendered_options());
        argv
    }
}

fn is_valid_option_key(key: &str) -> bool {
    let key = key.trim_start_matches('-');
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Wire shape of an `execute_command` request, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandExecutionSpec {
    pub command: String,
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub options: CommandOptions,
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl CommandExecutionSpec {
    /// Build a request, using `default_timeout` when none was supplied.
    pub fn into_request(
        self,
        default_timeout: u64,
    ) -> Result<CommandExecutionRequest, CommandRequestError> {
        let command = self.command.parse::<CliCommand>()?;
        CommandExecutionRequest::new(
            command,
            self.arguments,
            self.options,
            self.timeout.unwrap_or(default_timeout),
        )
    }
}

impl TryFrom<CommandExecutionSpec> for CommandExecutionRequest {
    type Error = CommandRequestError;

    fn try_from(spec: CommandExecutionSpec) -> Result<Self, Self::Error> {
        spec.into_request(DEFAULT_COMMAND_TIMEOUT_SECS)
    }
}

/// Outcome of one execution attempt. Produced exactly once per attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub execution_time_ms: f64,
}

impl ExecutionResult {
    pub fn new(
        exit_code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        execution_time_ms: f64,
    ) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            execution_time_ms,
        }
    }

    /// A result for an attempt that never produced a process exit code.
    pub fn failure(message: impl Into<String>, execution_time_ms: f64) -> Self {
        Self::new(-1, String::new(), message, execution_time_ms)
    }

    pub const fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}
