//! Typed arguments shared by the MCP tools and the `/mcp/v1` REST bodies.

use docbro_core::security::{contains_command_separator, validate_entity_name};
use docbro_core::{BoxType, CoreError, ProjectType};
use docbro_runtime::CliInvocation;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Deserialize tool arguments; a missing/null object counts as `{}`.
pub fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, CoreError> {
    let arguments = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| CoreError::Validation(e.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFilesArgs {
    pub project_name: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub include_content: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxListArgs {
    #[serde(default)]
    pub shelf: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCreateArgs {
    pub name: String,
    pub project_type: ProjectType,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRemoveArgs {
    pub name: String,
    #[serde(default)]
    pub confirm: bool,
}

/// Crawl bounds accepted by `crawl` and `fill`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlLimits {
    #[serde(default)]
    pub max_pages: Option<u32>,
    #[serde(default)]
    pub rate_limit: Option<f64>,
    #[serde(default)]
    pub depth: Option<u32>,
}

impl CrawlLimits {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_pages == Some(0) {
            return Err(CoreError::Validation("max_pages must be at least 1".into()));
        }
        if self.depth == Some(0) {
            return Err(CoreError::Validation("depth must be at least 1".into()));
        }
        if let Some(rate) = self.rate_limit {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(CoreError::Validation("rate_limit must be a positive number".into()));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn apply(&self, invocation: CliInvocation) -> CliInvocation {
        invocation
            .with_flag("--max-pages", self.max_pages)
            .with_flag("--rate-limit", self.rate_limit)
            .with_flag("--depth", self.depth)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlArgs {
    pub name: String,
    #[serde(flatten)]
    pub limits: CrawlLimits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfCreateArgs {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub set_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfNameArgs {
    pub shelf_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxCreateArgs {
    pub name: String,
    pub box_type: BoxType,
    #[serde(default)]
    pub shelf: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A box and the shelf it is added to or removed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxShelfArgs {
    pub box_name: String,
    pub shelf_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillArgs {
    pub box_name: String,
    pub source: String,
    #[serde(default)]
    pub shelf: Option<String>,
    #[serde(flatten)]
    pub limits: CrawlLimits,
}

pub fn check_name(kind: &'static str, name: &str) -> Result<(), CoreError> {
    validate_entity_name(kind, name).map_err(CoreError::from)
}

pub fn check_optional_name(kind: &'static str, name: Option<&str>) -> Result<(), CoreError> {
    name.map_or(Ok(()), |n| check_name(kind, n))
}

/// Free text passed as a flag value: descriptions, sources.
pub fn check_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if value.starts_with('-') {
        return Err(CoreError::Validation(format!("{field} must not start with '-'")));
    }
    if contains_command_separator(value) {
        return Err(CoreError::Security(format!(
            "{field} contains a command separator"
        )));
    }
    Ok(())
}
