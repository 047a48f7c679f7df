//! Git operations through the `git` CLI.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PublishError, PublishResult};

/// Identity recorded on every commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Default for Author {
    fn default() -> Self {
        Self {
            name: "pageforge".to_string(),
            email: "pageforge@localhost".to_string(),
        }
    }
}

/// Git commit information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitCommit {
    pub hash: String,
    pub message: String,
}

/// Git operations manager for one working tree.
#[derive(Debug)]
pub struct GitOps {
    repo_path: PathBuf,
}

impl GitOps {
    pub fn new<P: AsRef<Path>>(repo_path: P) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
        }
    }

    /// Check if Git is available on the system.
    pub fn is_git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    pub fn path(&self) -> &Path {
        &self.repo_path
    }

    pub fn is_initialized(&self) -> bool {
        self.repo_path.join(".git").exists()
    }

    /// Initialize a repository whose first branch is `branch`.
    pub fn init(&self, branch: &str) -> PublishResult<()> {
        if self.is_initialized() {
            debug!("Repository already initialized");
            return Ok(());
        }

        info!("Initializing Git repository at {}", self.repo_path.display());
        self.run(&["init"])?;
        self.run(&["symbolic-ref", "HEAD", &format!("refs/heads/{}", branch)])?;
        Ok(())
    }

    /// Stage everything in the working tree.
    pub fn add_all(&self) -> PublishResult<()> {
        self.ensure_initialized()?;
        self.run(&["add", "--all"])?;
        Ok(())
    }

    /// Whether the working tree differs from HEAD.
    pub fn has_changes(&self) -> PublishResult<bool> {
        self.ensure_initialized()?;
        Ok(!self.run(&["status", "--porcelain"])?.trim().is_empty())
    }

    /// Commit staged changes as `author`.
    pub fn commit(&self, message: &str, author: &Author) -> PublishResult<GitCommit> {
        self.ensure_initialized()?;

        let name = format!("user.name={}", author.name);
        let email = format!("user.email={}", author.email);
        self.run(&["-c", &name, "-c", &email, "commit", "-m", message])
            .map_err(|e| match e {
                PublishError::Git(msg) if msg.contains("nothing to commit") => {
                    PublishError::NothingToCommit
                }
                other => other,
            })?;

        Ok(GitCommit {
            hash: self.head()?,
            message: message.to_string(),
        })
    }

    /// Hash of the current HEAD commit.
    pub fn head(&self) -> PublishResult<String> {
        Ok(self.run(&["rev-parse", "HEAD"])?.trim().to_string())
    }

    pub fn get_remote(&self, name: &str) -> PublishResult<String> {
        self.run(&["remote", "get-url", name])
            .map(|url| url.trim().to_string())
            .map_err(|_| PublishError::Git(format!("No remote '{}' found", name)))
    }

    /// Add a remote, or repoint it when it already exists.
    pub fn set_remote(&self, name: &str, url: &str) -> PublishResult<()> {
        self.ensure_initialized()?;

        if self.get_remote(name).is_ok() {
            self.run(&["remote", "set-url", name, url])?;
        } else {
            self.run(&["remote", "add", name, url])?;
        }

        info!("Set remote '{}' -> {}", name, url);
        Ok(())
    }

    pub fn push(&self, remote: &str, branch: &str) -> PublishResult<()> {
        self.ensure_initialized()?;
        info!("Pushing to {} {}", remote, branch);
        self.run(&["push", "--set-upstream", remote, branch])?;
        Ok(())
    }

    fn ensure_initialized(&self) -> PublishResult<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(PublishError::Git("Repository not initialized".to_string()))
        }
    }

    /// Run git in the working tree and return stdout.
    fn run(&self, args: &[&str]) -> PublishResult<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .map_err(|e| PublishError::Git(format!("Failed to run git {}: {}", args[0], e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(PublishError::Git(format!(
                "git {} failed: {}{}",
                args[0],
                stderr.trim(),
                stdout.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_and_commit() {
        if !GitOps::is_git_available() {
            println!("Git not available, skipping test");
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        let git = GitOps::new(temp_dir.path());
        assert!(!git.is_initialized());

        git.init("main").unwrap();
        assert!(git.is_initialized());

        fs::write(temp_dir.path().join("index.html"), "<html></html>").unwrap();
        assert!(git.has_changes().unwrap());
        git.add_all().unwrap();
        let commit = git.commit("Initial commit", &Author::default()).unwrap();

        assert_eq!(commit.hash.len(), 40);
        assert_eq!(git.head().unwrap(), commit.hash);
        assert!(!git.has_changes().unwrap());
    }

    #[test]
    fn test_empty_commit_rejected() {
        if !GitOps::is_git_available() {
            println!("Git not available, skipping test");
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        let git = GitOps::new(temp_dir.path());
        git.init("main").unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        git.add_all().unwrap();
        git.commit("first", &Author::default()).unwrap();

        let result = git.commit("second", &Author::default());
        assert!(matches!(result, Err(PublishError::NothingToCommit)));
    }

    #[test]
    fn test_set_remote_twice() {
        if !GitOps::is_git_available() {
            println!("Git not available, skipping test");
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        let git = GitOps::new(temp_dir.path());
        git.init("main").unwrap();

        git.set_remote("origin", "https://example.com/a.git").unwrap();
        git.set_remote("origin", "https://example.com/b.git").unwrap();
        assert_eq!(git.get_remote("origin").unwrap(), "https://example.com/b.git");
    }

    #[test]
    fn test_uninitialized_operations_fail() {
        let temp_dir = TempDir::new().unwrap();
        let git = GitOps::new(temp_dir.path());
        assert!(git.add_all().is_err());
        assert!(git.commit("x", &Author::default()).is_err());
    }
}
