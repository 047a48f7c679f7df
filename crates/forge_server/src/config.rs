//! Server configuration: YAML file plus environment overrides.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use forge_publish::{Author, GitPublisherConfig};

use crate::delivery::RetryPolicy;
use crate::error::{ServerError, ServerResult};

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub publisher: PublisherSection,
    pub delivery: DeliverySection,
    pub llm: LlmSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    /// Accept unknown identities and remember the secret they present.
    pub permissive_auth: bool,
    /// Identity to shared secret.
    pub secrets: HashMap<String, String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            permissive_auth: false,
            secrets: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublisherKind {
    Git,
    #[default]
    Mock,
}

impl std::str::FromStr for PublisherKind {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "git" => Ok(Self::Git),
            "mock" => Ok(Self::Mock),
            other => Err(ServerError::Config(format!("Unknown publisher kind: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherSection {
    pub kind: PublisherKind,
    pub workspace_dir: PathBuf,
    pub remote_base: Option<String>,
    pub pages_base: Option<String>,
    pub branch: String,
    pub author: Author,
}

impl Default for PublisherSection {
    fn default() -> Self {
        let git = GitPublisherConfig::default();
        Self {
            kind: PublisherKind::default(),
            workspace_dir: git.workspace_dir,
            remote_base: git.remote_base,
            pages_base: git.pages_base,
            branch: git.branch,
            author: git.author,
        }
    }
}

impl PublisherSection {
    pub fn git_config(&self) -> GitPublisherConfig {
        GitPublisherConfig {
            workspace_dir: self.workspace_dir.clone(),
            remote_base: self.remote_base.clone(),
            pages_base: self.pages_base.clone(),
            branch: self.branch.clone(),
            author: self.author.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliverySection {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for DeliverySection {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            base_delay_ms: policy.base_delay.as_millis() as u64,
            timeout_secs: policy.request_timeout.as_secs(),
        }
    }
}

impl DeliverySection {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            request_timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// Use the LLM generator when an API key is present.
    pub enabled: bool,
    /// Model override; takes precedence over `FORGE_LLM_MODEL`.
    pub model: Option<String>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            enabled: true,
            model: None,
        }
    }
}

impl ServerConfig {
    /// Load from an optional YAML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ServerResult<Self> {
        debug!("Loading server config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> ServerResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply `FORGE_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ServerResult<()> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(bind) = get("FORGE_BIND") {
            self.server.bind = bind;
        }
        if let Some(value) = get("FORGE_PERMISSIVE_AUTH") {
            self.server.permissive_auth = parse_bool("FORGE_PERMISSIVE_AUTH", &value)?;
        }
        if let Some(kind) = get("FORGE_PUBLISHER") {
            self.publisher.kind = kind.parse()?;
        }
        if let Some(dir) = get("FORGE_WORKSPACE_DIR") {
            self.publisher.workspace_dir = PathBuf::from(dir);
        }
        if let Some(base) = get("FORGE_REMOTE_BASE") {
            self.publisher.remote_base = Some(base);
        }
        if let Some(base) = get("FORGE_PAGES_BASE") {
            self.publisher.pages_base = Some(base);
        }
        if let Some(value) = get("FORGE_DELIVERY_ATTEMPTS") {
            self.delivery.max_attempts = parse_number("FORGE_DELIVERY_ATTEMPTS", &value)?;
        }
        if let Some(value) = get("FORGE_DELIVERY_BASE_DELAY_MS") {
            self.delivery.base_delay_ms = parse_number("FORGE_DELIVERY_BASE_DELAY_MS", &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.delivery.max_attempts == 0 {
            return Err(ServerError::Config(
                "delivery.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(ServerError::Config(format!(
                "server.bind is not a socket address: {}",
                self.server.bind
            )));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> ServerResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn parse_bool(name: &str, value: &str) -> ServerResult<bool> {
    match value.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Ok(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Ok(false),
        other => Err(ServerError::Config(format!("{} is not a boolean: {}", name, other))),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> ServerResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ServerError::Config(format!("{} is not a number: {}", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.bind, "0.0.0.0:8000");
        assert!(!config.server.permissive_auth);
        assert_eq!(config.publisher.kind, PublisherKind::Mock);
        assert_eq!(config.delivery.max_attempts, 5);
        assert_eq!(config.delivery.base_delay_ms, 1000);
        assert_eq!(config.delivery.timeout_secs, 30);
        assert!(config.llm.enabled);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_yaml() {
        let config = ServerConfig::from_yaml(
            r#"
server:
  bind: 127.0.0.1:9000
  secrets:
    student@example.com: test123
publisher:
  kind: git
  workspace_dir: /srv/repos
  pages_base: https://pages.example.com
"#,
        )
        .unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.server.secrets["student@example.com"], "test123");
        assert_eq!(config.publisher.kind, PublisherKind::Git);
        assert_eq!(config.publisher.branch, "main");
        assert_eq!(config.delivery, DeliverySection::default());

        let git = config.publisher.git_config();
        assert_eq!(git.workspace_dir, PathBuf::from("/srv/repos"));
        assert_eq!(git.pages_base.as_deref(), Some("https://pages.example.com"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_overrides(vars(&[
                ("FORGE_BIND", "127.0.0.1:1234"),
                ("FORGE_PERMISSIVE_AUTH", "yes"),
                ("FORGE_PUBLISHER", "GIT"),
                ("FORGE_DELIVERY_ATTEMPTS", "2"),
                ("FORGE_DELIVERY_BASE_DELAY_MS", "10"),
                ("FORGE_REMOTE_BASE", ""),
            ]))
            .unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:1234");
        assert!(config.server.permissive_auth);
        assert_eq!(config.publisher.kind, PublisherKind::Git);
        assert_eq!(config.publisher.remote_base, None);

        let policy = config.delivery.retry_policy();
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.base_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_bad_overrides() {
        let mut config = ServerConfig::default();
        assert!(config
            .apply_overrides(vars(&[("FORGE_PERMISSIVE_AUTH", "maybe")]))
            .is_err());
        assert!(config
            .apply_overrides(vars(&[("FORGE_PUBLISHER", "s3")]))
            .is_err());
        assert!(config
            .apply_overrides(vars(&[("FORGE_DELIVERY_ATTEMPTS", "-1")]))
            .is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = ServerConfig::default();
        config.delivery.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.server.bind = "localhost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = ServerConfig::default();
        config.server.secrets.insert("a@b.c".to_string(), "s".to_string());
        let yaml = config.to_yaml().unwrap();
        assert_eq!(ServerConfig::from_yaml(&yaml).unwrap(), config);
    }
}
