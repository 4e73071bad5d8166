//! Command executor: validates and runs DocBro CLI subprocesses.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use docbro_core::security::{audited_substrings, check_command_line};
use docbro_core::{
    CommandExecutionRequest, CommandRejection, CommandState, ExecutionResult, ExecutorSettings,
};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::process::{DEFAULT_TERM_GRACE, capture_output, terminate_child};

/// How long to wait for output readers once the child has exited.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// A server-built CLI invocation (admin tools, CLI-backed collaborators).
///
/// The verb is fixed by the server, so it is not matched against the
/// `execute_command` allow-list, but it still goes through the blocked
/// pattern check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliInvocation {
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl CliInvocation {
    pub fn new<I, S>(args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    /// Append `--flag value` when `value` is present.
    #[must_use]
    pub fn with_flag(mut self, flag: &str, value: Option<impl ToString>) -> Self {
        if let Some(v) = value {
            self.args.push(flag.to_string());
            self.args.push(v.to_string());
        }
        self
    }

    /// Append a bare `--flag` when `enabled`.
    #[must_use]
    pub fn with_switch(mut self, flag: &str, enabled: bool) -> Self {
        if enabled {
            self.args.push(flag.to_string());
        }
        self
    }

    /// Space-joined rendering for logs and error messages.
    pub fn display(&self) -> String {
        self.args.join(" ")
    }
}

enum ProcessOutcome {
    Exited {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    TimedOut {
        stdout: String,
    },
    Failed(io::Error),
}

/// Runs allow-listed DocBro CLI commands as bounded subprocesses.
///
/// Holds no per-request state; concurrent executions each own their own
/// child process and request state machine.
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor {
    settings: ExecutorSettings,
}

impl CommandExecutor {
    pub const fn new(settings: ExecutorSettings) -> Self {
        Self { settings }
    }

    pub const fn settings(&self) -> &ExecutorSettings {
        &self.settings
    }

    /// Validate a request and advance it to `VALIDATED`, or move it to
    /// `FAILED` and return `false`. Never spawns anything.
    pub fn validate(&self, request: &mut CommandExecutionRequest) -> bool {
        self.try_validate(request).is_ok()
    }

    /// Like [`Self::validate`], but reports why the request was rejected.
    pub fn try_validate(
        &self,
        request: &mut CommandExecutionRequest,
    ) -> Result<(), CommandRejection> {
        let argv = request.argv();
        if let Err(rejection) = check_command_line(&argv) {
            warn!(
                target: "docbro.security",
                command = %request.command(),
                reason = %rejection,
                "Command rejected"
            );
            request.mark_failed();
            return Err(rejection);
        }

        let flagged = audited_substrings(&argv.join(" "));
        if !flagged.is_empty() {
            warn!(
                target: "docbro.security",
                command = %request.command(),
                patterns = ?flagged,
                "Command contains audited patterns"
            );
        }

        if let Err(e) = request.advance(CommandState::Validated) {
            debug!(error = %e, "Validation on a request that is past CREATED");
        }
        Ok(())
    }

    /// Execute a request, validating it first if it is still `CREATED`.
    ///
    /// Always returns a result: rejections, spawn errors and timeouts are
    /// reported with exit code -1 and the request ends in `FAILED`.
    pub async fn execute(&self, request: &mut CommandExecutionRequest) -> ExecutionResult {
        let started = Instant::now();

        if request.state() == CommandState::Created {
            if let Err(rejection) = self.try_validate(request) {
                return ExecutionResult::failure(
                    format!("Command validation failed: {rejection}"),
                    elapsed_ms(started),
                );
            }
        }

        if let Err(e) = request.advance(CommandState::Executing) {
            request.mark_failed();
            return ExecutionResult::failure(
                format!("Command cannot execute: {e}"),
                elapsed_ms(started),
            );
        }

        let argv = request.argv();
        let outcome = self.run_process(&argv, request.timeout()).await;
        let result = self.to_result(&argv, request.timeout(), outcome, started);

        let next = if result.succeeded() {
            CommandState::Completed
        } else {
            CommandState::Failed
        };
        if let Err(e) = request.advance(next) {
            warn!(error = %e, "Unexpected state after execution");
        }

        result
    }

    /// Run a server-built invocation.
    ///
    /// Returns the rejection when the arguments match a blocked pattern;
    /// nothing is spawned in that case.
    pub async fn run_invocation(
        &self,
        invocation: &CliInvocation,
    ) -> Result<ExecutionResult, CommandRejection> {
        if let Err(rejection) = check_command_line(&invocation.args) {
            warn!(
                target: "docbro.security",
                invocation = %invocation.display(),
                reason = %rejection,
                "Invocation rejected"
            );
            return Err(rejection);
        }

        let started = Instant::now();
        let outcome = self.run_process(&invocation.args, invocation.timeout).await;
        Ok(self.to_result(&invocation.args, invocation.timeout, outcome, started))
    }

    async fn run_process(&self, argv: &[String], limit: Duration) -> ProcessOutcome {
        let mut cmd = Command::new(&self.settings.cli_path);
        cmd.args(argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => return ProcessOutcome::Failed(e),
        };
        debug!(pid = ?child.id(), argv = ?argv, "Spawned CLI process");

        let capture = capture_output(&mut child);

        match tokio::time::timeout(limit, child.wait()).await {
            Ok(Ok(status)) => {
                let (stdout, stderr) = capture.finish(OUTPUT_DRAIN_GRACE).await;
                ProcessOutcome::Exited {
                    status,
                    stdout,
                    stderr,
                }
            }
            Ok(Err(e)) => ProcessOutcome::Failed(e),
            Err(_) => {
                if let Err(e) = terminate_child(&mut child, DEFAULT_TERM_GRACE).await {
                    warn!(error = %e, "Failed to terminate timed-out process");
                }
                let (stdout, _) = capture.finish(DEFAULT_TERM_GRACE).await;
                ProcessOutcome::TimedOut { stdout }
            }
        }
    }

    fn to_result(
        &self,
        argv: &[String],
        limit: Duration,
        outcome: ProcessOutcome,
        started: Instant,
    ) -> ExecutionResult {
        let elapsed = elapsed_ms(started);
        let command = argv.first().map_or("", String::as_str);

        let (result, timed_out) = match outcome {
            ProcessOutcome::Exited {
                status,
                stdout,
                stderr,
            } => (
                ExecutionResult::new(status.code().unwrap_or(-1), stdout, stderr, elapsed),
                false,
            ),
            ProcessOutcome::TimedOut { stdout } => (
                ExecutionResult::new(
                    -1,
                    stdout,
                    format!("Command timed out after {} seconds", limit.as_secs()),
                    elapsed,
                ),
                true,
            ),
            ProcessOutcome::Failed(e) => {
                let message = format!(
                    "Failed to run {}: {e}",
                    self.settings.cli_path.display()
                );
                (ExecutionResult::failure(message, elapsed), false)
            }
        };

        info!(
            target: "docbro.executor",
            command = %command,
            exit_code = result.exit_code,
            elapsed_ms = result.execution_time_ms,
            timed_out,
            "Command finished"
        );
        result
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
