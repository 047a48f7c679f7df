//! In-memory publisher.
//!
//! Used when no git workspace is configured and in tests. Keeps every
//! revision per task and fabricates predictable URLs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use forge_templates::SourceFileSet;

use crate::error::{PublishError, PublishResult};
use crate::publisher::{repo_name, Publisher, RepoInfo};

/// A revision recorded by [`MockPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRevision {
    pub files: SourceFileSet,
    /// Brief for creations, commit message for updates.
    pub message: String,
}

#[derive(Clone, Default)]
pub struct MockPublisher {
    repos: Arc<RwLock<HashMap<String, Vec<PublishedRevision>>>>,
    fail_with: Arc<RwLock<Option<String>>>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a task was already published.
    pub fn with_existing(self, task: &str, files: SourceFileSet) -> Self {
        self.repos.write().insert(
            task.to_string(),
            vec![PublishedRevision {
                files,
                message: "seeded".to_string(),
            }],
        );
        self
    }

    /// Make every create/update fail.
    pub fn simulate_failure(self, message: impl Into<String>) -> Self {
        *self.fail_with.write() = Some(message.into());
        self
    }

    /// All revisions of a task, oldest first.
    pub fn revisions(&self, task: &str) -> Vec<PublishedRevision> {
        self.repos.read().get(task).cloned().unwrap_or_default()
    }

    fn check_failure(&self) -> PublishResult<()> {
        match self.fail_with.read().clone() {
            Some(message) => Err(PublishError::Git(message)),
            None => Ok(()),
        }
    }

    fn record(&self, task: &str, files: &SourceFileSet, message: &str) -> RepoInfo {
        let mut repos = self.repos.write();
        let revisions = repos.entry(task.to_string()).or_default();
        revisions.push(PublishedRevision {
            files: files.clone(),
            message: message.to_string(),
        });
        repo_info(task, revisions.len())
    }
}

/// URLs reported for the `round`-th revision of a task.
pub fn repo_info(task: &str, round: usize) -> RepoInfo {
    let name = repo_name(task);
    RepoInfo {
        repo_url: format!("https://github.com/user/{}", name),
        commit_sha: format!("mock_commit_round_{}", round),
        pages_url: format!("https://user.github.io/{}/", name),
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn existing_files(&self, task: &str) -> PublishResult<Option<SourceFileSet>> {
        Ok(self
            .repos
            .read()
            .get(task)
            .and_then(|revisions| revisions.last())
            .map(|revision| revision.files.clone()))
    }

    async fn create(&self, task: &str, files: &SourceFileSet, brief: &str) -> PublishResult<RepoInfo> {
        self.check_failure()?;
        self.repos.write().remove(task);
        Ok(self.record(task, files, brief))
    }

    async fn update(&self, task: &str, files: &SourceFileSet, message: &str) -> PublishResult<RepoInfo> {
        self.check_failure()?;
        if !self.repos.read().contains_key(task) {
            return Err(PublishError::RepoNotFound(task.to_string()));
        }
        Ok(self.record(task, files, message))
    }

    fn kind(&self) -> &'static str {
        "mock"
    }
}
