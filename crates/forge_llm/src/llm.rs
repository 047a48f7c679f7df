//! LLM adapter for chat completions.
//!
//! Supports OpenAI and Anthropic APIs, selected via environment variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GenerateError, GenerateResult};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";

const MAX_RETRIES: u32 = 3;
const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.2;

/// LLM provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAI,
    Anthropic,
}

impl LlmProvider {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-haiku-latest",
        }
    }

    fn default_url(&self) -> &'static str {
        match self {
            Self::OpenAI => OPENAI_URL,
            Self::Anthropic => ANTHROPIC_URL,
        }
    }
}

/// LLM adapter that handles API calls
pub struct LlmAdapter {
    provider: LlmProvider,
    api_key: String,
    model: String,
    url: String,
    retry_delay: Duration,
    client: reqwest::Client,
}

impl LlmAdapter {
    /// Create a new LLM adapter with explicit configuration
    pub fn new(provider: LlmProvider, api_key: impl Into<String>, model: Option<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: model.unwrap_or_else(|| provider.default_model().to_string()),
            url: provider.default_url().to_string(),
            retry_delay: Duration::from_secs(1),
            client: reqwest::Client::new(),
        }
    }

    /// Create an LLM adapter from environment variables
    ///
    /// Checks in order:
    /// 1. OPENAI_API_KEY
    /// 2. ANTHROPIC_API_KEY
    ///
    /// `FORGE_LLM_MODEL` overrides the provider's default model.
    pub fn from_env() -> GenerateResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> GenerateResult<Self> {
        let custom_model = lookup("FORGE_LLM_MODEL").filter(|m| !m.is_empty());

        for (var, provider) in [
            ("OPENAI_API_KEY", LlmProvider::OpenAI),
            ("ANTHROPIC_API_KEY", LlmProvider::Anthropic),
        ] {
            if let Some(api_key) = lookup(var).filter(|k| !k.is_empty()) {
                return Ok(Self::new(provider, api_key, custom_model));
            }
        }

        Err(GenerateError::NotConfigured)
    }

    /// Whether either provider key is present in the environment.
    pub fn is_configured() -> bool {
        ["OPENAI_API_KEY", "ANTHROPIC_API_KEY"]
            .iter()
            .any(|var| std::env::var(var).map(|k| !k.is_empty()).unwrap_or(false))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the adapter at a different endpoint, such as a compatible proxy.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Base delay between retries; doubled after every attempt.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Get the current provider
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Get the current model
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one system + user exchange and return the reply text.
    pub async fn complete(&self, system: &str, user: &str) -> GenerateResult<String> {
        match self.provider {
            LlmProvider::OpenAI => self.complete_openai(system, user).await,
            LlmProvider::Anthropic => self.complete_anthropic(system, user).await,
        }
    }

    async fn complete_openai(&self, system: &str, user: &str) -> GenerateResult<String> {
        let request = OpenAIRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .send_with_retry(|| {
                self.client
                    .post(&self.url)
                    .header("Authorization", format!("Bearer {}", self.api_key))
                    .json(&request)
            })
            .await?;

        let result: OpenAIResponse = response.json().await?;
        result
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerateError::EmptyResponse(self.provider.name().to_string()))
    }

    async fn complete_anthropic(&self, system: &str, user: &str) -> GenerateResult<String> {
        // Anthropic takes the system prompt outside the message list
        let request = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system,
            messages: vec![ChatMessage {
                role: "user",
                content: user,
            }],
        };

        let response = self
            .send_with_retry(|| {
                self.client
                    .post(&self.url)
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", "2023-06-01")
                    .json(&request)
            })
            .await?;

        let result: AnthropicResponse = response.json().await?;
        let text: String = result
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect();
        if text.trim().is_empty() {
            return Err(GenerateError::EmptyResponse(self.provider.name().to_string()));
        }
        Ok(text)
    }

    /// Retry transient errors (network, 5xx, rate limits) with exponential
    /// backoff. Other HTTP errors fail immediately.
    async fn send_with_retry<F>(&self, build: F) -> GenerateResult<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut last_error: Option<GenerateError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = self.retry_delay * (1 << (attempt - 1));
                debug!(attempt = attempt + 1, ?delay, "Retrying LLM request");
                tokio::time::sleep(delay).await;
            }

            let response = match build().send().await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!(attempt = attempt + 1, "LLM request failed: {}", e);
                    last_error = Some(GenerateError::Network(e));
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            let error = GenerateError::Api {
                provider: self.provider.name().to_string(),
                status: status.as_u16(),
                body,
            };
            if !error.is_transient() {
                return Err(error);
            }
            warn!(
                attempt = attempt + 1,
                max = MAX_RETRIES,
                "{}",
                error
            );
            last_error = Some(error);
        }

        Err(GenerateError::RetriesExhausted {
            attempts: MAX_RETRIES,
            last: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no response".to_string()),
        })
    }
}

// Shared message shape
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: String,
}

// Anthropic API types
#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: Option<String>,
}
