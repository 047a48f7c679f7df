//! Build pipeline behavior with mocked collaborators.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use mockall::mock;
use parking_lot::Mutex;

use forge_core::{RevisionStatus, SourceFileSet, UpdateStrategy};
use forge_llm::{Attachment, CodeGenerator, GenerateError, GenerateResult};
use forge_publish::{MockPublisher, PublishResult, Publisher, RepoInfo};
use forge_server::{
    BuildPipeline, BuildRequest, DeliveryOutcome, EvaluationClient, EvaluationPayload,
    GenerationMethod, RetryPolicy,
};

mock! {
    pub Generator {}

    #[async_trait]
    impl CodeGenerator for Generator {
        async fn generate(
            &self,
            brief: &str,
            attachments: &[Attachment],
            checks: &[String],
        ) -> GenerateResult<SourceFileSet>;
    }
}

type Received = Arc<Mutex<Vec<EvaluationPayload>>>;

async fn record(State(received): State<Received>, Json(payload): Json<EvaluationPayload>) -> StatusCode {
    received.lock().push(payload);
    StatusCode::OK
}

async fn evaluator() -> (SocketAddr, Received) {
    let received: Received = Arc::default();
    let app = Router::new()
        .route("/evaluate", post(record))
        .with_state(received.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, received)
}

fn client() -> EvaluationClient {
    EvaluationClient::new(RetryPolicy {
        max_attempts: 2,
        base_delay: Duration::from_millis(5),
        request_timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn request(addr: SocketAddr, round: u8, brief: &str) -> BuildRequest {
    BuildRequest {
        email: "student@example.com".to_string(),
        secret: "test123".to_string(),
        task: "task-1".to_string(),
        round,
        nonce: "nonce-9".to_string(),
        brief: brief.to_string(),
        evaluation_url: format!("http://{}/evaluate", addr),
        attachments: vec![],
        checks: vec!["Has a button".to_string()],
    }
}

fn page() -> SourceFileSet {
    SourceFileSet::new("<html><body><h1>X</h1></body></html>", "h1 {}", "")
}

#[tokio::test]
async fn test_round1_uses_generator() {
    let (addr, received) = evaluator().await;
    let mut generator = MockGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .withf(|brief, _, checks| brief == "A greeting page" && checks.len() == 1)
        .returning(|_, _, _| Ok(page()));

    let publisher = MockPublisher::new();
    let pipeline = BuildPipeline::new(
        Some(Arc::new(generator)),
        Arc::new(publisher.clone()),
        client(),
    );

    let report = pipeline.process(request(addr, 1, "A greeting page")).await.unwrap();

    assert_eq!(report.method, GenerationMethod::Llm);
    assert_eq!(report.effective_round, 1);
    assert_eq!(report.delivery, DeliveryOutcome::Delivered { attempts: 1 });
    assert_eq!(publisher.revisions("task-1")[0].files, page());

    let payloads = received.lock();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].round, 1);
    assert_eq!(payloads[0].nonce, "nonce-9");
    assert_eq!(payloads[0].commit_sha, "mock_commit_round_1");
}

#[tokio::test]
async fn test_generator_failure_falls_back() {
    let (addr, _received) = evaluator().await;
    let mut generator = MockGenerator::new();
    generator
        .expect_generate()
        .returning(|_, _, _| Err(GenerateError::Failed("quota".to_string())));

    let publisher = MockPublisher::new();
    let pipeline = BuildPipeline::new(
        Some(Arc::new(generator)),
        Arc::new(publisher.clone()),
        client(),
    );

    let report = pipeline.process(request(addr, 1, "Build a calculator")).await.unwrap();

    assert_eq!(report.method, GenerationMethod::Fallback);
    let published = &publisher.revisions("task-1")[0].files;
    assert!(published.markup.contains("id=\"display\""));
}

#[tokio::test]
async fn test_no_generator_uses_fallback() {
    let (addr, _received) = evaluator().await;
    let publisher = MockPublisher::new();
    let pipeline = BuildPipeline::new(None, Arc::new(publisher.clone()), client());

    let report = pipeline.process(request(addr, 1, "simple counter")).await.unwrap();
    assert_eq!(report.method, GenerationMethod::Fallback);
    assert!(publisher.revisions("task-1")[0].files.markup.contains("id=\"increment\""));
}

#[tokio::test]
async fn test_round2_revises_existing() {
    let (addr, received) = evaluator().await;
    let mut generator = MockGenerator::new();
    generator.expect_generate().times(0);

    let publisher = MockPublisher::new().with_existing("task-1", page());
    let pipeline = BuildPipeline::new(
        Some(Arc::new(generator)),
        Arc::new(publisher.clone()),
        client(),
    );

    let report = pipeline.process(request(addr, 2, "Add dark mode")).await.unwrap();

    assert_eq!(report.method, GenerationMethod::Revision);
    assert_eq!(report.strategy, Some(UpdateStrategy::DarkMode));
    assert_eq!(
        report.revision_status,
        Some(RevisionStatus::Applied {
            markup_inserted: true
        })
    );

    let revisions = publisher.revisions("task-1");
    assert_eq!(revisions.len(), 2);
    assert!(revisions[1].files.markup.contains("darkModeToggle"));
    assert_eq!(revisions[1].message, "Round 2 updates - Add dark mode...");

    let payloads = received.lock();
    assert_eq!(payloads[0].round, 2);
    assert_eq!(payloads[0].commit_sha, "mock_commit_round_2");
}

#[tokio::test]
async fn test_round2_without_artifact_degrades() {
    let (addr, received) = evaluator().await;
    let publisher = MockPublisher::new();
    let pipeline = BuildPipeline::new(None, Arc::new(publisher.clone()), client());

    let report = pipeline.process(request(addr, 2, "Add search")).await.unwrap();

    assert_eq!(report.requested_round, 2);
    assert_eq!(report.effective_round, 1);
    assert_eq!(report.method, GenerationMethod::Fallback);
    assert_eq!(publisher.revisions("task-1").len(), 1);
    assert_eq!(publisher.revisions("task-1")[0].message, "Add search");

    // The callback still reports the round that was asked for.
    assert_eq!(received.lock()[0].round, 2);
}

#[tokio::test]
async fn test_publish_failure_skips_delivery() {
    let (addr, received) = evaluator().await;
    let publisher = MockPublisher::new().simulate_failure("remote rejected");
    let pipeline = BuildPipeline::new(None, Arc::new(publisher), client());

    let result = pipeline.process(request(addr, 1, "anything")).await;

    assert!(result.is_err());
    assert!(received.lock().is_empty());
}

#[tokio::test]
async fn test_charts_revision_publishes_unchanged_files() {
    let (addr, _received) = evaluator().await;
    let publisher = MockPublisher::new().with_existing("task-1", page());
    let pipeline = BuildPipeline::new(None, Arc::new(publisher.clone()), client());

    let report = pipeline.process(request(addr, 2, "Add a chart")).await.unwrap();

    assert_eq!(report.revision_status, Some(RevisionStatus::Unsupported));
    assert_eq!(publisher.revisions("task-1")[1].files, page());
}

/// Yields to the scheduler around every call, so concurrent builds interleave.
struct YieldingPublisher(MockPublisher);

#[async_trait]
impl Publisher for YieldingPublisher {
    async fn existing_files(&self, task: &str) -> PublishResult<Option<SourceFileSet>> {
        let files = self.0.existing_files(task).await;
        tokio::task::yield_now().await;
        files
    }

    async fn create(&self, task: &str, files: &SourceFileSet, brief: &str) -> PublishResult<RepoInfo> {
        tokio::task::yield_now().await;
        self.0.create(task, files, brief).await
    }

    async fn update(&self, task: &str, files: &SourceFileSet, message: &str) -> PublishResult<RepoInfo> {
        tokio::task::yield_now().await;
        self.0.update(task, files, message).await
    }

    fn kind(&self) -> &'static str {
        "yielding"
    }
}

#[tokio::test]
async fn test_concurrent_revisions_of_one_task_stack() {
    let (addr, _received) = evaluator().await;
    let publisher = MockPublisher::new().with_existing("task-1", page());
    let pipeline = BuildPipeline::new(
        None,
        Arc::new(YieldingPublisher(publisher.clone())),
        client(),
    );

    let (dark, search) = tokio::join!(
        pipeline.process(request(addr, 2, "Add dark mode")),
        pipeline.process(request(addr, 2, "Add search")),
    );
    dark.unwrap();
    search.unwrap();

    let revisions = publisher.revisions("task-1");
    assert_eq!(revisions.len(), 3);
    let latest = &revisions[2].files.markup;
    assert!(latest.contains("darkModeToggle"));
    assert!(latest.contains("searchInput"));
}
