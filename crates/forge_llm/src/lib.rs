//! # forge_llm
//!
//! The generative collaborator used for round 1 builds.
//!
//! A [`CodeGenerator`] turns a brief, its evaluation checks and any
//! attachments into a complete [`SourceFileSet`]. The production
//! implementation, [`LlmGenerator`], prompts a chat model through
//! [`LlmAdapter`], parses the JSON reply and normalizes the three files so
//! each is usable on its own. [`MockGenerator`] replays scripted replies.

pub mod error;
pub mod generator;
pub mod llm;
pub mod mock;
pub mod prompt;
pub mod sanitize;

pub use error::{GenerateError, GenerateResult};
pub use generator::{Attachment, CodeGenerator, LlmGenerator};
pub use llm::{LlmAdapter, LlmProvider};
pub use mock::{GenerateCall, MockGenerator, MockReply};
pub use prompt::{attachment_summary, Prompt};
pub use sanitize::{clean_files, parse_files, strip_code_fences};

pub use forge_templates::SourceFileSet;
