use std::sync::Arc;
use std::time::Duration;

use docbro_core::CollaboratorError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::executor::{CliInvocation, CommandExecutor};

/// Runs JSON-producing CLI queries for the port adapters.
#[derive(Debug, Clone)]
pub struct CliClient {
    executor: Arc<CommandExecutor>,
    timeout: Duration,
}

impl CliClient {
    pub fn new(executor: Arc<CommandExecutor>) -> Self {
        let timeout = Duration::from_secs(executor.settings().default_timeout_secs);
        Self { executor, timeout }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run `args --format json` and deserialize stdout.
    ///
    /// When the output is an object wrapping the payload (e.g.
    /// `{"projects": [...]}`), the value under `key` is used.
    pub async fn query<T: DeserializeOwned>(
        &self,
        args: Vec<String>,
        key: &str,
    ) -> Result<T, CollaboratorError> {
        let invocation =
            CliInvocation::new(args, self.timeout).with_flag("--format", Some("json"));

        let result = self
            .executor
            .run_invocation(&invocation)
            .await
            .map_err(|rejection| CollaboratorError::Failed(rejection.to_string()))?;

        if !result.succeeded() {
            let message = first_non_empty(&result.stderr, &result.stdout);
            debug!(
                invocation = %invocation.display(),
                exit_code = result.exit_code,
                "CLI query failed"
            );
            return Err(classify_failure(result.exit_code, message));
        }

        let value: Value = serde_json::from_str(result.stdout.trim())
            .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))?;
        let payload = match value {
            Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or_default(),
            other => other,
        };
        serde_json::from_value(payload)
            .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))
    }
}

/// A caller-supplied argv value. Refuses anything the CLI would parse as
/// an option.
pub(crate) fn value_arg(value: &str) -> Result<String, CollaboratorError> {
    if value.trim().is_empty() || value.trim_start().starts_with('-') {
        return Err(CollaboratorError::InvalidArgument(format!(
            "'{value}' is not a valid argument value"
        )));
    }
    Ok(value.to_string())
}

fn first_non_empty<'a>(a: &'a str, b: &'a str) -> &'a str {
    let a = a.trim();
    if a.is_empty() { b.trim() } else { a }
}

fn classify_failure(exit_code: i32, message: &str) -> CollaboratorError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("not found") || lower.contains("does not exist") {
        CollaboratorError::NotFound(message.to_string())
    } else if exit_code == -1 {
        // never produced an exit status: spawn failure or timeout
        CollaboratorError::Unavailable(message.to_string())
    } else {
        CollaboratorError::Failed(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_classified() {
        assert!(matches!(
            classify_failure(1, "Shelf 'x' not found"),
            CollaboratorError::NotFound(_)
        ));
        assert!(matches!(
            classify_failure(-1, "Command timed out after 30 seconds"),
            CollaboratorError::Unavailable(_)
        ));
        assert!(matches!(classify_failure(2, "boom"), CollaboratorError::Failed(_)));
    }

    #[test]
    fn option_like_values_are_refused() {
        assert_eq!(value_arg("tokio docs").unwrap(), "tokio docs");
        for bad in ["--all", "-x", "  --remove", "", "   "] {
            assert!(
                matches!(value_arg(bad), Err(CollaboratorError::InvalidArgument(_))),
                "{bad:?}"
            );
        }
    }
}
