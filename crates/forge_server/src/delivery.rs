//! Evaluation callback delivery with retries.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use forge_publish::RepoInfo;

use crate::error::ServerResult;

/// Body posted to the evaluation URL once a build is published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationPayload {
    pub email: String,
    pub task: String,
    pub round: u8,
    pub nonce: String,
    pub repo_url: String,
    pub commit_sha: String,
    pub pages_url: String,
}

impl EvaluationPayload {
    pub fn new(email: &str, task: &str, round: u8, nonce: &str, repo: &RepoInfo) -> Self {
        Self {
            email: email.to_string(),
            task: task.to_string(),
            round,
            nonce: nonce.to_string(),
            repo_url: repo.repo_url.clone(),
            commit_sha: repo.commit_sha.clone(),
            pages_url: repo.pages_url.clone(),
        }
    }
}

/// Exponential backoff: waits `base_delay * 2^n` after the n-th failed
/// attempt, never after the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Wait after the zero-based `attempt` failed.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered { attempts: u32 },
    Exhausted { attempts: u32 },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Delivered { attempts } | Self::Exhausted { attempts } => *attempts,
        }
    }
}

/// Posts evaluation payloads. Only HTTP 200 counts as delivered.
#[derive(Clone)]
pub struct EvaluationClient {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl EvaluationClient {
    pub fn new(policy: RetryPolicy) -> ServerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(policy.request_timeout)
            .build()?;
        Ok(Self { client, policy })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn submit(&self, url: &str, payload: &EvaluationPayload) -> DeliveryOutcome {
        let max = self.policy.max_attempts.max(1);

        for attempt in 0..max {
            info!(attempt = attempt + 1, max, task = %payload.task, "Submitting to evaluation URL");

            match self.client.post(url).json(payload).send().await {
                Ok(response) if response.status().as_u16() == 200 => {
                    info!(task = %payload.task, attempts = attempt + 1, "Evaluation accepted");
                    return DeliveryOutcome::Delivered {
                        attempts: attempt + 1,
                    };
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    warn!(attempt = attempt + 1, %status, "Evaluation URL returned {}", body);
                }
                Err(e) => {
                    warn!(attempt = attempt + 1, "Error submitting to evaluation URL: {}", e);
                }
            }

            if attempt + 1 < max {
                tokio::time::sleep(self.policy.delay_after(attempt)).await;
            }
        }

        error!(task = %payload.task, attempts = max, "Failed to submit to evaluation URL");
        DeliveryOutcome::Exhausted { attempts: max }
    }
}
