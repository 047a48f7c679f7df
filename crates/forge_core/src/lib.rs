//! # forge_core
//!
//! The revision engine for pageforge.
//!
//! Everything in this crate is pure and synchronous: each call reads its
//! inputs and allocates a new output, so it is safe to share across request
//! handlers without locking.
//!
//! # Architecture
//!
//! - **Rules**: ordered keyword tables where the first matching rule wins
//! - **Classifier**: maps a revision brief to an [`UpdateStrategy`]
//! - **Injector**: splices a fragment bundle into an existing file set
//! - **Fallback**: builds a baseline application from a brief
//! - **Revision**: ties the above together for a [`RevisionRequest`]
//!
//! # Example
//!
//! ```rust
//! use forge_core::{RevisionEngine, RevisionRequest, SourceFileSet, UpdateStrategy};
//!
//! let existing = SourceFileSet::new("<html><body><h1>X</h1></body></html>", "", "");
//! let engine = RevisionEngine::new();
//! let outcome = engine.revise(&RevisionRequest::new("add dark mode", existing));
//!
//! assert_eq!(outcome.strategy, Some(UpdateStrategy::DarkMode));
//! assert!(outcome.files.markup.contains("darkModeToggle"));
//! ```

pub mod classifier;
pub mod fallback;
pub mod injector;
pub mod revision;
pub mod rules;

pub use classifier::{classify, Classifier};
pub use fallback::{generate_from_brief, FallbackGenerator};
pub use injector::{apply, inject, StructuralInjector};
pub use revision::{RevisionEngine, RevisionOutcome, RevisionStatus};
pub use rules::{KeywordRule, RuleTable};

// Re-export the data model so callers only need this crate.
pub use forge_templates::{
    Anchor, BaselineKind, FileRole, FragmentBundle, RevisionRequest, SourceFileSet,
    UpdateStrategy,
};
