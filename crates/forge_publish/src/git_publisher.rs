//! Publisher backed by one local git repository per task.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use forge_templates::{SourceFileSet, TemplateRenderer};

use crate::error::{PublishError, PublishResult};
use crate::git::{Author, GitOps};
use crate::publisher::{repo_name, Publisher, RepoInfo};

const REMOTE: &str = "origin";

/// Settings for [`GitPublisher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitPublisherConfig {
    /// Directory holding one working tree per task.
    pub workspace_dir: PathBuf,
    /// Remote base URL, e.g. `https://github.com/acme`. Nothing is pushed
    /// when unset.
    pub remote_base: Option<String>,
    /// Pages base URL or template. `{{repo}}` is replaced by the repository
    /// name; a plain base gets `/<repo>/` appended.
    pub pages_base: Option<String>,
    pub branch: String,
    pub author: Author,
}

impl Default for GitPublisherConfig {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::from("./pageforge-repos"),
            remote_base: None,
            pages_base: None,
            branch: "main".to_string(),
            author: Author::default(),
        }
    }
}

#[derive(Clone)]
pub struct GitPublisher {
    config: Arc<GitPublisherConfig>,
    renderer: Arc<TemplateRenderer>,
}

impl GitPublisher {
    pub fn new(config: GitPublisherConfig) -> Self {
        Self {
            config: Arc::new(config),
            renderer: Arc::new(TemplateRenderer::new()),
        }
    }

    pub fn config(&self) -> &GitPublisherConfig {
        &self.config
    }

    /// Working tree for a task.
    pub fn repo_dir(&self, task: &str) -> PathBuf {
        self.config.workspace_dir.join(repo_name(task))
    }

    fn repo_url(&self, name: &str, dir: &Path) -> String {
        match &self.config.remote_base {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), name),
            None => format!("file://{}", absolute(dir).display()),
        }
    }

    fn pages_url(&self, name: &str, dir: &Path) -> String {
        match &self.config.pages_base {
            Some(base) if base.contains("{{repo}}") => {
                self.renderer.render_with(base, &[("repo", name)])
            }
            Some(base) => format!("{}/{}/", base.trim_end_matches('/'), name),
            None => format!("file://{}", absolute(dir).join("index.html").display()),
        }
    }

    fn create_blocking(&self, task: &str, files: &SourceFileSet, brief: &str) -> PublishResult<RepoInfo> {
        ensure_git()?;
        let name = repo_name(task);
        let dir = self.repo_dir(task);
        info!(task, repo = %name, "Creating repository");

        files.write_dir(&dir)?;
        fs::write(dir.join("README.md"), readme(&name, brief))?;

        let git = GitOps::new(&dir);
        git.init(&self.config.branch)?;
        let message = format!("Initial commit: {}", truncate_chars(brief, 50));
        self.commit_and_push(&git, &name, &message)
    }

    fn update_blocking(&self, task: &str, files: &SourceFileSet, message: &str) -> PublishResult<RepoInfo> {
        ensure_git()?;
        let name = repo_name(task);
        let dir = self.repo_dir(task);
        let git = GitOps::new(&dir);
        if !git.is_initialized() {
            return Err(PublishError::RepoNotFound(task.to_string()));
        }
        info!(task, repo = %name, "Updating repository");

        files.write_dir(&dir)?;
        self.commit_and_push(&git, &name, message)
    }

    fn commit_and_push(&self, git: &GitOps, name: &str, message: &str) -> PublishResult<RepoInfo> {
        git.add_all()?;
        let commit_sha = match git.commit(message, &self.config.author) {
            Ok(commit) => commit.hash,
            Err(PublishError::NothingToCommit) => {
                warn!(repo = name, "No changes to commit, reusing HEAD");
                git.head()?
            }
            Err(e) => return Err(e),
        };

        if self.config.remote_base.is_some() {
            git.set_remote(REMOTE, &self.repo_url(name, git.path()))?;
            git.push(REMOTE, &self.config.branch)?;
        } else {
            debug!(repo = name, "No remote configured, skipping push");
        }

        Ok(RepoInfo {
            repo_url: self.repo_url(name, git.path()),
            commit_sha,
            pages_url: self.pages_url(name, git.path()),
        })
    }

    async fn blocking<T, F>(&self, f: F) -> PublishResult<T>
    where
        T: Send + 'static,
        F: FnOnce(GitPublisher) -> PublishResult<T> + Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || f(this))
            .await
            .map_err(|e| PublishError::Task(e.to_string()))?
    }
}

#[async_trait]
impl Publisher for GitPublisher {
    async fn existing_files(&self, task: &str) -> PublishResult<Option<SourceFileSet>> {
        let dir = self.repo_dir(task);
        if !GitOps::new(&dir).is_initialized() {
            return Ok(None);
        }
        Ok(SourceFileSet::load_dir(&dir)?)
    }

    async fn create(&self, task: &str, files: &SourceFileSet, brief: &str) -> PublishResult<RepoInfo> {
        let (task, files, brief) = (task.to_string(), files.clone(), brief.to_string());
        self.blocking(move |this| this.create_blocking(&task, &files, &brief))
            .await
    }

    async fn update(&self, task: &str, files: &SourceFileSet, message: &str) -> PublishResult<RepoInfo> {
        let (task, files, message) = (task.to_string(), files.clone(), message.to_string());
        self.blocking(move |this| this.update_blocking(&task, &files, &message))
            .await
    }

    fn kind(&self) -> &'static str {
        "git"
    }
}

fn ensure_git() -> PublishResult<()> {
    if GitOps::is_git_available() {
        Ok(())
    } else {
        Err(PublishError::GitUnavailable)
    }
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn readme(name: &str, brief: &str) -> String {
    format!(
        "# {}\n\n{}\n\n## Files\n\n- `index.html`\n- `style.css`\n- `script.js`\n\nServe the directory as static files to run the app.\n",
        name, brief
    )
}

/// First `max` characters of `s`.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
