//! Filesystem behaviour of the file access controller.

use docbro_core::{FileAccessController, ProjectType};
use std::fs;
use tempfile::TempDir;

fn project_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("guide")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join("README.md"), "# Docs\n").unwrap();
    fs::write(root.join("guide/intro.md"), "Hello").unwrap();
    fs::write(root.join(".git/config"), "secret").unwrap();
    fs::write(root.join(".env"), "TOKEN=x").unwrap();
    dir
}

#[tokio::test]
async fn metadata_lists_visible_files_recursively() {
    let dir = project_tree();
    let controller = FileAccessController::new();

    let files = controller.get_file_metadata(dir.path(), None).await;
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();

    assert_eq!(paths, vec!["README.md", "guide/intro.md"]);
    assert_eq!(files[0].size, 7);
    assert_eq!(files[0].content_type, "text/markdown");
}

#[tokio::test]
async fn metadata_for_subdirectory_and_bad_inputs() {
    let dir = project_tree();
    let controller = FileAccessController::new();

    let files = controller.get_file_metadata(dir.path(), Some("guide")).await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "guide/intro.md");

    assert!(controller.get_file_metadata(dir.path(), Some("../")).await.is_empty());
    assert!(
        controller
            .get_file_metadata(&dir.path().join("missing"), None)
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn content_only_for_storage_projects() {
    let dir = project_tree();
    let controller = FileAccessController::new();

    assert_eq!(
        controller
            .get_file_content(dir.path(), "guide/intro.md", ProjectType::Storage)
            .await
            .as_deref(),
        Some("Hello")
    );
    for project_type in [ProjectType::Crawling, ProjectType::Data] {
        assert!(
            controller
                .get_file_content(dir.path(), "guide/intro.md", project_type)
                .await
                .is_none()
        );
    }
}

#[tokio::test]
async fn content_rejects_traversal_hidden_and_missing() {
    let dir = project_tree();
    let controller = FileAccessController::new();

    for path in ["../etc/passwd", "/etc/passwd", ".env", ".git/config", "missing.md", "guide"] {
        assert!(
            controller
                .get_file_content(dir.path(), path, ProjectType::Storage)
                .await
                .is_none(),
            "{path}"
        );
    }
}

#[cfg(unix)]
#[tokio::test]
async fn content_rejects_symlink_escape() {
    let outside = tempfile::tempdir().unwrap();
    fs::write(outside.path().join("secret.txt"), "top secret").unwrap();

    let dir = project_tree();
    std::os::unix::fs::symlink(outside.path().join("secret.txt"), dir.path().join("link.txt"))
        .unwrap();

    let controller = FileAccessController::new();
    assert!(
        controller
            .get_file_content(dir.path(), "link.txt", ProjectType::Storage)
            .await
            .is_none()
    );
}

#[cfg(unix)]
#[tokio::test]
async fn metadata_does_not_follow_directory_links_out_of_the_project() {
    let outside = tempfile::tempdir().unwrap();
    fs::write(outside.path().join("secret.txt"), "top secret").unwrap();

    let dir = project_tree();
    std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

    let controller = FileAccessController::new();
    assert!(
        controller
            .get_file_metadata(dir.path(), Some("link"))
            .await
            .is_empty()
    );

    let listed = controller.get_file_metadata(dir.path(), None).await;
    assert!(listed.iter().all(|f| !f.path.contains("secret")));
}

#[cfg(unix)]
#[tokio::test]
async fn metadata_follows_links_that_stay_inside() {
    let dir = project_tree();
    std::os::unix::fs::symlink(dir.path().join("guide"), dir.path().join("alias")).unwrap();

    let controller = FileAccessController::new();
    let files = controller.get_file_metadata(dir.path(), Some("alias")).await;
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["guide/intro.md"]);
}

#[tokio::test]
async fn content_replaces_invalid_utf8() {
    let dir = project_tree();
    fs::write(dir.path().join("bin.txt"), [b'o', b'k', 0xff, 0xfe]).unwrap();

    let controller = FileAccessController::new();
    let text = controller
        .get_file_content(dir.path(), "bin.txt", ProjectType::Storage)
        .await
        .unwrap();
    assert!(text.starts_with("ok"));
    assert!(text.contains('\u{FFFD}'));
}

#[tokio::test]
async fn content_respects_size_limit() {
    let dir = project_tree();
    let controller = FileAccessController::new().with_max_content_bytes(3);
    assert!(
        controller
            .get_file_content(dir.path(), "README.md", ProjectType::Storage)
            .await
            .is_none()
    );
}

#[tokio::test]
async fn listing_ignores_project_type_and_filters_hidden() {
    let dir = project_tree();
    let controller = FileAccessController::new();

    let mut visible = controller
        .list_accessible_files(dir.path(), ProjectType::Crawling, false)
        .await;
    visible.sort();
    assert_eq!(visible, vec!["README.md", "guide/intro.md"]);

    let all = controller
        .list_accessible_files(dir.path(), ProjectType::Crawling, true)
        .await;
    assert!(all.contains(&".env".to_string()));
    assert!(all.contains(&".git/config".to_string()));
}
