//! # forge_publish
//!
//! Stores generated applications so they can be served and revised.
//!
//! - [`GitPublisher`] keeps one git working tree per task, commits every
//!   revision and pushes when a remote base is configured.
//! - [`MockPublisher`] keeps revisions in memory and reports fixed URLs.

pub mod error;
pub mod git;
pub mod git_publisher;
pub mod mock;
pub mod publisher;

pub use error::{PublishError, PublishResult};
pub use git::{Author, GitCommit, GitOps};
pub use git_publisher::{GitPublisher, GitPublisherConfig};
pub use mock::{MockPublisher, PublishedRevision};
pub use publisher::{repo_name, Publisher, RepoInfo};
