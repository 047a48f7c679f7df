//! The code generator abstraction and its LLM-backed implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use forge_templates::SourceFileSet;

use crate::error::GenerateResult;
use crate::llm::LlmAdapter;
use crate::prompt::Prompt;
use crate::sanitize::{clean_files, parse_files};

/// A file referenced by a build request, usually a data URI or a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Upper-cased extension, or `FILE` when the name has none.
    pub fn file_type(&self) -> String {
        match self.name.rsplit_once('.') {
            Some((_, ext)) => ext.to_uppercase(),
            None => "FILE".to_string(),
        }
    }
}

/// Produces a complete application from a brief.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    async fn generate(
        &self,
        brief: &str,
        attachments: &[Attachment],
        checks: &[String],
    ) -> GenerateResult<SourceFileSet>;
}

/// Generator that asks a chat model for the three files.
pub struct LlmGenerator {
    adapter: LlmAdapter,
}

impl LlmGenerator {
    pub fn new(adapter: LlmAdapter) -> Self {
        Self { adapter }
    }

    /// Build from `OPENAI_API_KEY`/`ANTHROPIC_API_KEY`.
    pub fn from_env() -> GenerateResult<Self> {
        Ok(Self::new(LlmAdapter::from_env()?))
    }

    pub fn adapter(&self) -> &LlmAdapter {
        &self.adapter
    }
}

#[async_trait]
impl CodeGenerator for LlmGenerator {
    async fn generate(
        &self,
        brief: &str,
        attachments: &[Attachment],
        checks: &[String],
    ) -> GenerateResult<SourceFileSet> {
        info!(
            model = self.adapter.model(),
            attachments = attachments.len(),
            checks = checks.len(),
            "Generating application with LLM"
        );
        let prompt = Prompt::build(brief, checks, attachments);
        let raw = self.adapter.complete(&prompt.system, &prompt.user).await?;
        debug!(bytes = raw.len(), "LLM response received");

        let files = parse_files(&raw)?;
        Ok(clean_files(files, brief))
    }
}
