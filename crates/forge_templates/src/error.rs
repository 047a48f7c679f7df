//! Error types for templates.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while parsing strategies or loading and writing
/// file sets.
///
/// Rendering itself never fails.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Unknown update strategy: {0}")]
    UnknownStrategy(String),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
