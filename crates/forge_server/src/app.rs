//! Wiring configuration into a running server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use forge_llm::{CodeGenerator, LlmAdapter, LlmGenerator};
use forge_publish::{GitOps, GitPublisher, MockPublisher, Publisher};

use crate::auth::{InMemorySecretStore, SecretVerifier};
use crate::config::{PublisherKind, ServerConfig};
use crate::delivery::EvaluationClient;
use crate::error::{ServerError, ServerResult};
use crate::http::{build_router, AppState};
use crate::pipeline::BuildPipeline;

/// Build the shared application state from configuration.
pub fn build_state(config: &ServerConfig) -> ServerResult<AppState> {
    let generator = build_generator(config);

    let publisher: Arc<dyn Publisher> = match config.publisher.kind {
        PublisherKind::Git => {
            if !GitOps::is_git_available() {
                return Err(ServerError::Config(
                    "publisher.kind is git but git is not installed".to_string(),
                ));
            }
            std::fs::create_dir_all(&config.publisher.workspace_dir)?;
            Arc::new(GitPublisher::new(config.publisher.git_config()))
        }
        PublisherKind::Mock => Arc::new(MockPublisher::new()),
    };

    let client = EvaluationClient::new(config.delivery.retry_policy())?;
    let pipeline = BuildPipeline::new(generator, publisher, client);

    let store = Arc::new(InMemorySecretStore::with_secrets(config.server.secrets.clone()));
    if config.server.permissive_auth {
        warn!("Permissive auth enabled: unknown identities register on first use");
    }
    let verifier = SecretVerifier::new(store, config.server.permissive_auth);

    Ok(AppState {
        pipeline: Arc::new(pipeline),
        verifier,
    })
}

fn build_generator(config: &ServerConfig) -> Option<Arc<dyn CodeGenerator>> {
    if !config.llm.enabled {
        info!("LLM generation disabled by configuration");
        return None;
    }

    match LlmAdapter::from_env() {
        Ok(adapter) => {
            let adapter = match &config.llm.model {
                Some(model) => adapter.with_model(model.clone()),
                None => adapter,
            };
            info!(provider = adapter.provider().name(), model = adapter.model(), "LLM generator ready");
            Some(Arc::new(LlmGenerator::new(adapter)))
        }
        Err(e) => {
            warn!("{}; round 1 builds will use the fallback generator", e);
            None
        }
    }
}

/// Serve until ctrl-c.
pub async fn serve(config: ServerConfig) -> ServerResult<()> {
    let state = build_state(&config)?;
    let app = build_router(state);

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.server.bind.clone(),
            source,
        })?;
    info!(
        bind = %config.server.bind,
        publisher = ?config.publisher.kind,
        "pageforge server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
