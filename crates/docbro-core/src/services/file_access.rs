//! File access controller.
//!
//! Gates what a caller may see of a project's files. Listing is always
//! allowed; content is only exposed for storage projects, and only for
//! paths that resolve inside the project root.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::domain::{
    FileAccessRequest, FileAccessType, FileMetadata, ProjectType, is_access_allowed,
};
use crate::security::is_safe_file_path;

/// Largest file whose content will be returned.
pub const DEFAULT_MAX_CONTENT_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FileAccessController {
    max_content_bytes: u64,
}

impl Default for FileAccessController {
    fn default() -> Self {
        Self::new()
    }
}

impl FileAccessController {
    pub const fn new() -> Self {
        Self {
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
        }
    }

    #[must_use]
    pub const fn with_max_content_bytes(mut self, max: u64) -> Self {
        self.max_content_bytes = max;
        self
    }

    /// Apply the access matrix to a request.
    pub const fn validate_access(
        &self,
        request: &FileAccessRequest,
        project_type: ProjectType,
    ) -> bool {
        is_access_allowed(project_type, request.access_type())
    }

    /// Metadata for every file under `root`, or under `root/path` when a
    /// path is given. Never fails: a missing root, an unsafe path, a path
    /// resolving outside `root` or an unreadable tree all produce an empty
    /// list.
    pub async fn get_file_metadata(&self, root: &Path, path: Option<&str>) -> Vec<FileMetadata> {
        let (root, start) = match path {
            Some(p) if !is_safe_file_path(p) => {
                warn!(target: "docbro.security", path = %p, "Rejected unsafe metadata path");
                return Vec::new();
            }
            Some(p) => match resolve_within(root, p).await {
                // walk from the resolved directory; paths stay relative to
                // the resolved root
                Some(resolved) => resolved,
                None => return Vec::new(),
            },
            None => (root.to_path_buf(), root.to_path_buf()),
        };

        tokio::task::spawn_blocking(move || collect_metadata(&root, &start))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Metadata scan task failed");
                Vec::new()
            })
    }

    /// Text content of `root/path`.
    ///
    /// Returns `None` when the project is not a storage project, the path is
    /// unsafe or escapes `root` after resolving symlinks, the file is missing,
    /// or it exceeds the size limit. Invalid UTF-8 is replaced, not rejected.
    pub async fn get_file_content(
        &self,
        root: &Path,
        path: &str,
        project_type: ProjectType,
    ) -> Option<String> {
        if !is_access_allowed(project_type, FileAccessType::Content) {
            debug!(project_type = %project_type, "Content access denied by project type");
            return None;
        }
        if !is_safe_file_path(path) {
            warn!(target: "docbro.security", path = %path, "Rejected unsafe content path");
            return None;
        }

        let (_, target) = resolve_within(root, path).await?;
        let meta = tokio::fs::metadata(&target).await.ok()?;
        if !meta.is_file() {
            return None;
        }
        if meta.len() > self.max_content_bytes {
            debug!(path = %path, size = meta.len(), "File exceeds content size limit");
            return None;
        }

        let bytes = tokio::fs::read(&target).await.ok()?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Every listable file under `root`, relative and `/`-separated.
    ///
    /// Listing does not depend on the project type; hidden entries are
    /// skipped unless `include_hidden` is set.
    pub async fn list_accessible_files(
        &self,
        root: &Path,
        project_type: ProjectType,
        include_hidden: bool,
    ) -> Vec<String> {
        debug!(
            root = %root.display(),
            project_type = %project_type,
            include_hidden,
            "Listing files"
        );
        let root = root.to_path_buf();

        tokio::task::spawn_blocking(move || {
            walk(&root, include_hidden)
                .filter_map(|entry| relative_path(&root, entry.path()))
                .collect()
        })
        .await
        .unwrap_or_default()
    }
}

/// Canonicalise `root/path` and confirm it is still a descendant of `root`.
/// Returns the canonical root alongside the resolved path.
async fn resolve_within(root: &Path, path: &str) -> Option<(PathBuf, PathBuf)> {
    let canonical_root = tokio::fs::canonicalize(root).await.ok()?;
    let candidate = tokio::fs::canonicalize(root.join(path)).await.ok()?;
    if candidate.starts_with(&canonical_root) {
        Some((canonical_root, candidate))
    } else {
        warn!(
            target: "docbro.security",
            path = %path,
            "Resolved path escapes project root"
        );
        None
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn walk(start: &Path, include_hidden: bool) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(start)
        .follow_links(false)
        .into_iter()
        .filter_entry(move |e| include_hidden || e.depth() == 0 || !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

fn collect_metadata(root: &Path, start: &Path) -> Vec<FileMetadata> {
    if !start.exists() {
        return Vec::new();
    }
    let mut files: Vec<FileMetadata> = walk(start, false)
        .filter_map(|entry| {
            let meta = entry.metadata().ok()?;
            let path = relative_path(root, entry.path())?;
            let modified_at = meta
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            Some(FileMetadata {
                content_type: content_type_for(&path).to_string(),
                path,
                size: meta.len(),
                modified_at,
            })
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

/// MIME type guessed from the file extension.
fn content_type_for(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("md" | "markdown") => "text/markdown",
        Some("txt" | "rst") => "text/plain",
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("js" | "mjs") => "text/javascript",
        Some("json") => "application/json",
        Some("yaml" | "yml") => "application/yaml",
        Some("toml") => "application/toml",
        Some("xml") => "application/xml",
        Some("csv") => "text/csv",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("zip") => "application/zip",
        Some("rs" | "py" | "go" | "java" | "c" | "h" | "cpp" | "ts" | "sh") => "text/x-source",
        _ => "application/octet-stream",
    }
}
