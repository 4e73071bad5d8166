//! Project types, access levels and the access matrix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How much of a project's files may be exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Crawling,
    Data,
    Storage,
}

impl ProjectType {
    pub const ALL: [Self; 3] = [Self::Crawling, Self::Data, Self::Storage];

    /// Highest access level this project type permits.
    pub const fn max_access(self) -> FileAccessType {
        match self {
            Self::Crawling | Self::Data => FileAccessType::Metadata,
            Self::Storage => FileAccessType::Download,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Crawling => "crawling",
            Self::Data => "data",
            Self::Storage => "storage",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crawling" => Ok(Self::Crawling),
            "data" => Ok(Self::Data),
            "storage" => Ok(Self::Storage),
            other => Err(format!(
                "unknown project type '{other}' (expected crawling, data or storage)"
            )),
        }
    }
}

/// Requested access level, ordered by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAccessType {
    Metadata = 1,
    Content = 2,
    Download = 3,
}

impl FileAccessType {
    pub const ALL: [Self; 3] = [Self::Metadata, Self::Content, Self::Download];

    pub const fn rank(self) -> u8 {
        self as u8
    }
}

/// The access matrix: allowed iff the requested rank does not exceed the
/// project type's maximum rank.
pub const fn is_access_allowed(project_type: ProjectType, access: FileAccessType) -> bool {
    access.rank() <= project_type.max_access().rank()
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FileAccessError {
    #[error("project name must not be empty")]
    EmptyProjectName,

    #[error("file path must be relative and must not contain '..': {0}")]
    UnsafePath(String),
}

/// A validated request for project files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAccessRequest {
    project_name: String,
    file_path: Option<String>,
    access_type: FileAccessType,
}

impl FileAccessRequest {
    pub fn new(
        project_name: impl Into<String>,
        file_path: Option<String>,
        access_type: FileAccessType,
    ) -> Result<Self, FileAccessError> {
        let project_name = project_name.into();
        if project_name.trim().is_empty() {
            return Err(FileAccessError::EmptyProjectName);
        }
        if let Some(path) = file_path
            .as_ref()
            .filter(|p| p.starts_with('/') || p.contains(".."))
        {
            return Err(FileAccessError::UnsafePath(path.clone()));
        }
        Ok(Self {
            project_name,
            file_path,
            access_type,
        })
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    pub const fn access_type(&self) -> FileAccessType {
        self.access_type
    }
}

/// One listed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Path relative to the project root, `/`-separated.
    pub path: String,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
    pub content_type: String,
}
