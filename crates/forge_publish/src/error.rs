//! Error types for publishing.

use thiserror::Error;

use forge_templates::TemplateError;

/// Result type alias for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Errors that can occur while publishing a file set.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Git error: {0}")]
    Git(String),

    #[error("Git is not available on this system")]
    GitUnavailable,

    #[error("No repository for task: {0}")]
    RepoNotFound(String),

    #[error("Nothing to commit")]
    NothingToCommit,

    #[error("Publish task failed: {0}")]
    Task(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
