//! # forge_server
//!
//! Accepts build requests over HTTP, runs them in the background and reports
//! the published result to the caller's evaluation URL.
//!
//! Round 1 requests generate a fresh application, through the configured
//! [`CodeGenerator`](forge_llm::CodeGenerator) when there is one and the
//! deterministic fallback otherwise. Round 2 requests revise the previously
//! published files with the revision engine.

pub mod app;
pub mod auth;
pub mod config;
pub mod delivery;
pub mod error;
pub mod http;
pub mod pipeline;

pub use app::{build_state, serve};
pub use auth::{InMemorySecretStore, SecretStore, SecretVerifier};
pub use config::{PublisherKind, ServerConfig};
pub use delivery::{DeliveryOutcome, EvaluationClient, EvaluationPayload, RetryPolicy};
pub use error::{ServerError, ServerResult};
pub use http::{build_router, ApiError, AppState};
pub use pipeline::{BuildPipeline, BuildReport, BuildRequest, GenerationMethod};
