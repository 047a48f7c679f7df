//! HTTP surface.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::auth::SecretVerifier;
use crate::pipeline::{BuildPipeline, BuildRequest};

/// Fields every build request must carry, checked in this order.
pub const REQUIRED_FIELDS: [&str; 6] = ["email", "task", "round", "nonce", "brief", "evaluation_url"];

pub const SERVICE_NAME: &str = "pageforge";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<BuildPipeline>,
    pub verifier: SecretVerifier,
}

/// Error body: `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail)
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct BuildAccepted {
    pub status: &'static str,
    pub message: String,
    pub task: String,
    pub round: u8,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/build", post(build))
        .with_state(state)
}

async fn build(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<BuildAccepted>, ApiError> {
    let field = |name: &str| body.get(name).and_then(Value::as_str).unwrap_or("");
    if !state.verifier.verify(field("email"), field("secret")) {
        return Err(ApiError::forbidden("Invalid secret"));
    }

    for name in REQUIRED_FIELDS {
        if body.get(name).map_or(true, Value::is_null) {
            return Err(ApiError::bad_request(format!("Missing required field: {}", name)));
        }
    }

    if !matches!(body["round"].as_u64(), Some(1) | Some(2)) {
        return Err(ApiError::bad_request("Round must be 1 or 2"));
    }

    let request: BuildRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid build request: {}", e)))?;
    info!(task = %request.task, round = request.round, "Received build request");

    let accepted = BuildAccepted {
        status: "accepted",
        message: format!("Round {} build request is being processed", request.round),
        task: request.task.clone(),
        round: request.round,
    };

    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        let task = request.task.clone();
        match pipeline.process(request).await {
            Ok(report) => info!(
                task = %report.task,
                build_id = %report.build_id,
                delivered = report.delivery.is_delivered(),
                "Build finished"
            ),
            Err(e) => error!(task = %task, "Build failed: {}", e),
        }
    });

    Ok(Json(accepted))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let fully_configured =
        state.pipeline.has_generator() && state.pipeline.publisher().kind() != "mock";
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "config": if fully_configured { "fully_configured" } else { "partial_config" },
        "publisher": state.pipeline.publisher().kind(),
        "features": ["round1", "round2", "llm_generation", "fallback_generation", "structural_revision"],
    }))
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "pageforge build API is running",
        "endpoints": {
            "POST /api/build": "Accept build and revision requests (rounds 1 and 2)",
            "GET /health": "Health check with configuration status",
        },
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
