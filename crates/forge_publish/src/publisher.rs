//! The publisher abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use forge_templates::SourceFileSet;

use crate::error::PublishResult;

/// Where a published revision lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub repo_url: String,
    pub commit_sha: String,
    pub pages_url: String,
}

/// Stores file sets, one repository per task.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Files of the task's latest revision, or `None` when nothing was
    /// published for it yet.
    async fn existing_files(&self, task: &str) -> PublishResult<Option<SourceFileSet>>;

    /// Publish the first revision of a task.
    async fn create(&self, task: &str, files: &SourceFileSet, brief: &str)
        -> PublishResult<RepoInfo>;

    /// Publish a follow-up revision.
    async fn update(&self, task: &str, files: &SourceFileSet, message: &str)
        -> PublishResult<RepoInfo>;

    /// Short name for logs and health output.
    fn kind(&self) -> &'static str;
}

/// Repository name for a task: lower-cased, runs of anything but ASCII
/// letters and digits collapsed to `-`, prefixed with `repo-`.
pub fn repo_name(task: &str) -> String {
    let mut slug = String::with_capacity(task.len());
    for c in task.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("untitled");
    }
    format!("repo-{}", slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_name() {
        assert_eq!(repo_name("calc-123"), "repo-calc-123");
        assert_eq!(repo_name("My Task__v2!"), "repo-my-task-v2");
        assert_eq!(repo_name("  lead/trail  "), "repo-lead-trail");
        assert_eq!(repo_name("Ünïcode ok"), "repo-n-code-ok");
        assert_eq!(repo_name("???"), "repo-untitled");
    }
}
