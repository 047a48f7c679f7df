//! Scripted code generator for tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use forge_templates::SourceFileSet;

use crate::error::{GenerateError, GenerateResult};
use crate::generator::{Attachment, CodeGenerator};

/// A scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Files(SourceFileSet),
    Fail(String),
}

/// Captured call information for verification.
#[derive(Debug, Clone)]
pub struct GenerateCall {
    pub brief: String,
    pub attachments: Vec<Attachment>,
    pub checks: Vec<String>,
}

/// Generator that replays scripted replies and records every call.
///
/// Replies are consumed in order; once exhausted the last reply repeats.
/// With no replies at all, every call fails.
#[derive(Clone, Default)]
pub struct MockGenerator {
    replies: Arc<RwLock<VecDeque<MockReply>>>,
    last: Arc<RwLock<Option<MockReply>>>,
    calls: Arc<RwLock<Vec<GenerateCall>>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn with_files(self, files: SourceFileSet) -> Self {
        self.replies.write().push_back(MockReply::Files(files));
        self
    }

    /// Queue a failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.replies.write().push_back(MockReply::Fail(message.into()));
        self
    }

    pub fn calls(&self) -> Vec<GenerateCall> {
        self.calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().len()
    }

    fn next_reply(&self) -> Option<MockReply> {
        if let Some(reply) = self.replies.write().pop_front() {
            *self.last.write() = Some(reply.clone());
            return Some(reply);
        }
        self.last.read().clone()
    }
}

#[async_trait]
impl CodeGenerator for MockGenerator {
    async fn generate(
        &self,
        brief: &str,
        attachments: &[Attachment],
        checks: &[String],
    ) -> GenerateResult<SourceFileSet> {
        self.calls.write().push(GenerateCall {
            brief: brief.to_string(),
            attachments: attachments.to_vec(),
            checks: checks.to_vec(),
        });

        match self.next_reply() {
            Some(MockReply::Files(files)) => Ok(files),
            Some(MockReply::Fail(message)) => Err(GenerateError::Failed(message)),
            None => Err(GenerateError::Failed("no scripted reply".to_string())),
        }
    }
}
