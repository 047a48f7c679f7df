//! The build pipeline: generate or revise, publish, then report back.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as TaskMutex;
use tracing::{info, warn};
use uuid::Uuid;

use forge_core::{
    FallbackGenerator, RevisionEngine, RevisionRequest, RevisionStatus, SourceFileSet,
    UpdateStrategy,
};
use forge_llm::{Attachment, CodeGenerator};
use forge_publish::{Publisher, RepoInfo};

use crate::delivery::{DeliveryOutcome, EvaluationClient, EvaluationPayload};
use crate::error::ServerResult;

/// A validated build request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    pub email: String,
    #[serde(default)]
    pub secret: String,
    pub task: String,
    pub round: u8,
    pub nonce: String,
    pub brief: String,
    pub evaluation_url: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub checks: Vec<String>,
}

/// How the published files were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    Llm,
    Fallback,
    Revision,
}

/// Summary of one processed build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub build_id: Uuid,
    pub task: String,
    pub requested_round: u8,
    /// Round actually performed; a revision with nothing to revise is
    /// performed as round 1.
    pub effective_round: u8,
    pub method: GenerationMethod,
    pub strategy: Option<UpdateStrategy>,
    pub revision_status: Option<RevisionStatus>,
    pub repo: RepoInfo,
    pub delivery: DeliveryOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

struct Produced {
    files: SourceFileSet,
    method: GenerationMethod,
    strategy: Option<UpdateStrategy>,
    revision_status: Option<RevisionStatus>,
}

pub struct BuildPipeline {
    generator: Option<Arc<dyn CodeGenerator>>,
    publisher: Arc<dyn Publisher>,
    client: EvaluationClient,
    engine: RevisionEngine,
    fallback: FallbackGenerator,
    /// One lock per task; builds of the same task publish one at a time.
    task_locks: Mutex<HashMap<String, Arc<TaskMutex<()>>>>,
}

impl BuildPipeline {
    pub fn new(
        generator: Option<Arc<dyn CodeGenerator>>,
        publisher: Arc<dyn Publisher>,
        client: EvaluationClient,
    ) -> Self {
        Self {
            generator,
            publisher,
            client,
            engine: RevisionEngine::new(),
            fallback: FallbackGenerator::new(),
            task_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub fn publisher(&self) -> &dyn Publisher {
        self.publisher.as_ref()
    }

    /// Run a build to completion, including evaluation delivery.
    ///
    /// Generation never fails the build; publish errors do, and nothing is
    /// delivered in that case.
    pub async fn process(&self, request: BuildRequest) -> ServerResult<BuildReport> {
        let build_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%build_id, task = %request.task, round = request.round, "Processing build request");

        let task_lock = self.task_lock(&request.task);
        let published = {
            let _guard = task_lock.lock().await;
            self.publish(&request).await
        };
        drop(task_lock);
        self.release_task_lock(&request.task);
        let (effective_round, produced, repo) = published?;
        info!(%build_id, repo = %repo.repo_url, commit = %repo.commit_sha, "Published");

        let payload = EvaluationPayload::new(
            &request.email,
            &request.task,
            request.round,
            &request.nonce,
            &repo,
        );
        let delivery = self.client.submit(&request.evaluation_url, &payload).await;
        if !delivery.is_delivered() {
            warn!(%build_id, task = %request.task, "Build published but evaluation delivery failed");
        }

        Ok(BuildReport {
            build_id,
            task: request.task,
            requested_round: request.round,
            effective_round,
            method: produced.method,
            strategy: produced.strategy,
            revision_status: produced.revision_status,
            repo,
            delivery,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Read, produce and publish. Callers hold the task lock.
    async fn publish(&self, request: &BuildRequest) -> ServerResult<(u8, Produced, RepoInfo)> {
        let existing = if request.round == 2 {
            self.publisher
                .existing_files(&request.task)
                .await?
                .filter(|files| !files.is_empty())
        } else {
            None
        };

        let effective_round = match (request.round, &existing) {
            (2, None) => {
                warn!(task = %request.task, "Round 2 without a prior artifact, building as round 1");
                1
            }
            (round, _) => round,
        };

        let produced = match existing {
            Some(files) => self.revise(request, files),
            None => self.generate(request).await,
        };

        let repo = if effective_round == 1 {
            self.publisher
                .create(&request.task, &produced.files, &request.brief)
                .await?
        } else {
            let message = commit_message(request.round, &request.brief);
            self.publisher
                .update(&request.task, &produced.files, &message)
                .await?
        };
        Ok((effective_round, produced, repo))
    }

    fn task_lock(&self, task: &str) -> Arc<TaskMutex<()>> {
        self.task_locks
            .lock()
            .entry(task.to_string())
            .or_default()
            .clone()
    }

    fn release_task_lock(&self, task: &str) {
        let mut locks = self.task_locks.lock();
        if locks.get(task).map_or(false, |lock| Arc::strong_count(lock) == 1) {
            locks.remove(task);
        }
    }

    async fn generate(&self, request: &BuildRequest) -> Produced {
        if let Some(generator) = &self.generator {
            match generator
                .generate(&request.brief, &request.attachments, &request.checks)
                .await
            {
                Ok(files) => {
                    return Produced {
                        files,
                        method: GenerationMethod::Llm,
                        strategy: None,
                        revision_status: None,
                    }
                }
                Err(e) => warn!(task = %request.task, "LLM generation failed, using fallback: {}", e),
            }
        } else {
            info!("No generator configured, using fallback");
        }

        Produced {
            files: self.fallback.generate(&request.brief),
            method: GenerationMethod::Fallback,
            strategy: None,
            revision_status: None,
        }
    }

    fn revise(&self, request: &BuildRequest, existing: SourceFileSet) -> Produced {
        let outcome = self
            .engine
            .revise(&RevisionRequest::new(request.brief.clone(), existing));
        Produced {
            files: outcome.files,
            method: GenerationMethod::Revision,
            strategy: outcome.strategy,
            revision_status: Some(outcome.status),
        }
    }
}

/// Commit message for a follow-up round.
pub fn commit_message(round: u8, brief: &str) -> String {
    let head: String = brief.chars().take(50).collect();
    format!("Round {} updates - {}...", round, head)
}
