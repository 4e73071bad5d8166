//! Fake DocBro CLI scripts for executor tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use docbro_core::ExecutorSettings;
use docbro_runtime::CommandExecutor;
use tempfile::TempDir;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Write an executable `/bin/sh` script named `docbro` into `dir`.
#[cfg(unix)]
pub fn fake_cli(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("docbro");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Executor pointed at a fake CLI built from `body`.
#[cfg(unix)]
pub fn executor_with(body: &str) -> (TempDir, Arc<CommandExecutor>) {
    let dir = tempfile::tempdir().unwrap();
    let cli = fake_cli(dir.path(), body);
    let executor = CommandExecutor::new(ExecutorSettings::with_defaults().with_cli_path(cli));
    (dir, Arc::new(executor))
}
