//! Security utilities: argument sanitisation, blocked command patterns,
//! path safety, loopback classification and entity-name rules.
//!
//! Everything here is a pure function. Callers run these checks before any
//! subprocess or filesystem side effect.

use std::net::IpAddr;
use thiserror::Error;

/// Characters that would chain or pipe shell commands.
pub const COMMAND_SEPARATORS: [char; 3] = [';', '|', '&'];

/// Substrings flagged for audit when they appear in a rendered command.
/// Matching is informational only.
pub const AUDITED_SUBSTRINGS: [&str; 3] = ["rm ", "delete", "--force"];

/// Maximum length for project, shelf and box names.
pub const MAX_NAME_LEN: usize = 100;

pub fn contains_command_separator(value: &str) -> bool {
    value.contains(COMMAND_SEPARATORS)
}

/// First argument containing a command separator, if any.
pub fn find_unsafe_argument<S: AsRef<str>>(args: &[S]) -> Option<&str> {
    args.iter()
        .map(AsRef::as_ref)
        .find(|arg| contains_command_separator(arg))
}

/// Why a command line was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandRejection {
    #[error("argument contains a command separator: {0}")]
    Separator(String),

    #[error("recursive 'serve' invocation is not allowed")]
    RecursiveServe,

    #[error("destructive setup operations (uninstall/reset) are not allowed")]
    DestructiveSetup,

    #[error("bulk or wildcard project removal is not allowed")]
    BulkProjectRemoval,
}

/// Check a full CLI argument vector (subcommand first) against the blocked
/// patterns.
pub fn check_command_line<S: AsRef<str>>(argv: &[S]) -> Result<(), CommandRejection> {
    let tokens: Vec<&str> = argv.iter().map(AsRef::as_ref).collect();

    if let Some(bad) = find_unsafe_argument(&tokens) {
        return Err(CommandRejection::Separator(bad.to_string()));
    }

    if tokens.iter().any(|t| t.trim().eq_ignore_ascii_case("serve")) {
        return Err(CommandRejection::RecursiveServe);
    }

    match tokens.first().map(|t| t.trim().to_ascii_lowercase()).as_deref() {
        Some("setup") => {
            let destructive = tokens.iter().skip(1).any(|t| {
                let lower = t.to_ascii_lowercase();
                lower.contains("uninstall") || lower.contains("reset")
            });
            if destructive {
                return Err(CommandRejection::DestructiveSetup);
            }
        }
        Some("project") => {
            let removing = tokens
                .iter()
                .any(|t| *t == "--remove" || t.starts_with("--remove="));
            let bulk = tokens
                .iter()
                .any(|t| *t == "--all" || t.starts_with("--all=") || t.contains('*'));
            if removing && bulk {
                return Err(CommandRejection::BulkProjectRemoval);
            }
        }
        _ => {}
    }

    Ok(())
}

/// Audited substrings present in a rendered command line.
pub fn audited_substrings(rendered: &str) -> Vec<&'static str> {
    let lower = rendered.to_ascii_lowercase();
    AUDITED_SUBSTRINGS
        .into_iter()
        .filter(|pattern| lower.contains(pattern))
        .collect()
}

/// Whether a caller-supplied relative path may touch the filesystem.
///
/// Rejects empty paths, absolute paths, any `..`, backslashes, NUL bytes
/// and any segment starting with `.` (hidden files).
pub fn is_safe_file_path(path: &str) -> bool {
    if path.is_empty()
        || path.starts_with('/')
        || path.contains("..")
        || path.contains('\\')
        || path.contains('\0')
    {
        return false;
    }
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .all(|segment| !segment.starts_with('.'))
}

/// Whether `host` names the loopback interface.
pub fn is_localhost(host: &str) -> bool {
    let host = host.trim();
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    bare.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("{0} name must not be empty")]
    Empty(&'static str),

    #[error("{kind} name must be at most 100 characters")]
    TooLong { kind: &'static str },

    #[error("{kind} name must not start with '.' or '-'")]
    BadStart { kind: &'static str },

    #[error("{kind} name contains invalid character {ch:?}")]
    InvalidChar { kind: &'static str, ch: char },
}

/// Validate a project, shelf or box name: 1-100 characters drawn from
/// letters, digits, space, `_`, `.` and `-`, not starting with `.` or `-`.
pub fn validate_entity_name(kind: &'static str, name: &str) -> Result<(), NameError> {
    if name.trim().is_empty() {
        return Err(NameError::Empty(kind));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(NameError::TooLong { kind });
    }
    if name.starts_with('.') || name.starts_with('-') {
        return Err(NameError::BadStart { kind });
    }
    if let Some(ch) = name
        .chars()
        .find(|&c| !(c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '.' | '-')))
    {
        return Err(NameError::InvalidChar { kind, ch });
    }
    Ok(())
}
