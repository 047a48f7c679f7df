//! Integration tests for the git publisher.

use std::fs;

use forge_publish::{GitOps, GitPublisher, GitPublisherConfig, PublishError, Publisher};
use forge_templates::SourceFileSet;
use tempfile::TempDir;

fn publisher(dir: &TempDir) -> GitPublisher {
    GitPublisher::new(GitPublisherConfig {
        workspace_dir: dir.path().to_path_buf(),
        pages_base: Some("https://pages.example.com".to_string()),
        ..Default::default()
    })
}

fn site(title: &str) -> SourceFileSet {
    SourceFileSet::new(
        format!("<!DOCTYPE html><html><body><h1>{}</h1></body></html>", title),
        "h1 { color: teal; }",
        "console.log('ready');",
    )
}

#[tokio::test]
async fn test_create_writes_and_commits() {
    if !GitOps::is_git_available() {
        println!("Git not available, skipping test");
        return;
    }

    let dir = TempDir::new().unwrap();
    let publisher = publisher(&dir);

    let info = publisher
        .create("Task 7", &site("Seven"), "A page titled Seven")
        .await
        .unwrap();

    let repo = dir.path().join("repo-task-7");
    assert!(repo.join(".git").exists());
    assert_eq!(
        fs::read_to_string(repo.join("style.css")).unwrap(),
        "h1 { color: teal; }"
    );
    assert!(fs::read_to_string(repo.join("README.md"))
        .unwrap()
        .contains("A page titled Seven"));

    assert_eq!(info.commit_sha.len(), 40);
    assert!(info.repo_url.starts_with("file://"));
    assert_eq!(info.pages_url, "https://pages.example.com/repo-task-7/");
}

#[tokio::test]
async fn test_update_round_trips_through_existing_files() {
    if !GitOps::is_git_available() {
        println!("Git not available, skipping test");
        return;
    }

    let dir = TempDir::new().unwrap();
    let publisher = publisher(&dir);

    assert!(publisher.existing_files("t").await.unwrap().is_none());
    let first = publisher.create("t", &site("One"), "one").await.unwrap();

    let existing = publisher.existing_files("t").await.unwrap().unwrap();
    assert_eq!(existing, site("One"));

    let second = publisher
        .update("t", &site("Two"), "Round 2 updates - two...")
        .await
        .unwrap();
    assert_ne!(first.commit_sha, second.commit_sha);
    assert_eq!(
        publisher.existing_files("t").await.unwrap().unwrap().markup,
        site("Two").markup
    );
}

#[tokio::test]
async fn test_unchanged_update_reuses_head() {
    if !GitOps::is_git_available() {
        println!("Git not available, skipping test");
        return;
    }

    let dir = TempDir::new().unwrap();
    let publisher = publisher(&dir);

    let first = publisher.create("same", &site("S"), "s").await.unwrap();
    let second = publisher.update("same", &site("S"), "no-op").await.unwrap();
    assert_eq!(first.commit_sha, second.commit_sha);
}

#[tokio::test]
async fn test_update_without_repo() {
    if !GitOps::is_git_available() {
        println!("Git not available, skipping test");
        return;
    }

    let dir = TempDir::new().unwrap();
    let result = publisher(&dir).update("ghost", &site("G"), "msg").await;
    assert!(matches!(result, Err(PublishError::RepoNotFound(task)) if task == "ghost"));
}
