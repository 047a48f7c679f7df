//! # forge_templates
//!
//! Source file sets and string templates for pageforge.
//!
//! This crate owns everything that is text rather than logic:
//!
//! - The three-file [`SourceFileSet`] every generated application is made of
//! - The [`UpdateStrategy`] tags a revision brief can resolve to
//! - The fragment library: one markup/stylesheet/script bundle per strategy
//! - The baseline applications used when nothing exists yet
//! - A small `{{placeholder}}` renderer shared by all of the above
//!
//! ## Example
//!
//! ```rust
//! use forge_templates::{FragmentLibrary, UpdateStrategy};
//!
//! let library = FragmentLibrary::new();
//! let bundle = library.bundle(UpdateStrategy::DarkMode, "add dark mode").unwrap();
//! assert!(bundle.markup.contains("darkModeToggle"));
//! ```

pub mod baseline;
pub mod error;
pub mod fileset;
pub mod fragments;
pub mod renderer;
pub mod strategy;

pub use baseline::{Baseline, BaselineKind};
pub use error::{TemplateError, TemplateResult};
pub use fileset::{FileRole, SourceFileSet};
pub use fragments::{Anchor, FragmentBundle, FragmentLibrary};
pub use renderer::TemplateRenderer;
pub use strategy::{RevisionRequest, UpdateStrategy};
