// Client configuration for Arena sessions
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// What the coordinator does with an intent issued while another is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrencyPolicy {
    /// Abort the outstanding request and start the new one (last intent wins)
    #[default]
    Replace,
    /// Refuse the new intent until the outstanding one settles
    Reject,
}

impl FromStr for ConcurrencyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "replace" => Ok(ConcurrencyPolicy::Replace),
            "reject" => Ok(ConcurrencyPolicy::Reject),
            other => Err(format!("invalid concurrency policy '{}' (replace, reject)", other)),
        }
    }
}

impl fmt::Display for ConcurrencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcurrencyPolicy::Replace => write!(f, "replace"),
            ConcurrencyPolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Transport behind the real-time feedback channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackMode {
    /// Poll the submission endpoint until it is judged
    #[default]
    Polling,
    /// Timer-driven demo sequence, no network
    Simulated,
    Off,
}

impl FromStr for FeedbackMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polling" => Ok(FeedbackMode::Polling),
            "simulated" => Ok(FeedbackMode::Simulated),
            "off" => Ok(FeedbackMode::Off),
            other => Err(format!(
                "invalid feedback mode '{}' (polling, simulated, off)",
                other
            )),
        }
    }
}

impl fmt::Display for FeedbackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackMode::Polling => write!(f, "polling"),
            FeedbackMode::Simulated => write!(f, "simulated"),
            FeedbackMode::Off => write!(f, "off"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Gateway base URL, without the `/api/v1` prefix
    pub api_url: String,
    /// Bearer credential attached to every request
    pub token: Option<String>,
    pub request_timeout_ms: u64,
    pub concurrency: ConcurrencyPolicy,
    pub feedback: FeedbackMode,
    pub poll_interval_ms: u64,
    pub simulated_step_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080".to_string(),
            token: None,
            request_timeout_ms: 30_000,
            concurrency: ConcurrencyPolicy::default(),
            feedback: FeedbackMode::default(),
            poll_interval_ms: 1_000,
            simulated_step_ms: 2_000,
        }
    }
}

impl ClientConfig {
    pub const DEFAULT_PATH: &'static str = "config/client.json";

    /// Load configuration from a JSON file
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            bail!("Client config file not found: {}", config_path.display());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: ClientConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// config/client.json when present, defaults otherwise, then environment overrides
    pub fn load_default() -> Result<Self> {
        let default_path = Path::new(Self::DEFAULT_PATH);
        let config = if default_path.exists() {
            Self::load(default_path)?
        } else {
            Self::default()
        };

        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `ARENA_*` overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ARENA_API_URL") {
            self.api_url = url;
        }
        if let Some(token) = lookup("ARENA_TOKEN") {
            self.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(timeout) = lookup("ARENA_TIMEOUT_MS") {
            self.request_timeout_ms = timeout
                .parse()
                .with_context(|| format!("ARENA_TIMEOUT_MS is not a number: {}", timeout))?;
        }
        if let Some(feedback) = lookup("ARENA_FEEDBACK") {
            self.feedback = feedback.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(policy) = lookup("ARENA_CONCURRENCY") {
            self.concurrency = policy.parse().map_err(anyhow::Error::msg)?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            bail!("api_url must be an http(s) URL, got '{}'", self.api_url);
        }
        if self.request_timeout_ms == 0 {
            bail!("request_timeout_ms must be greater than zero");
        }
        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn simulated_step(&self) -> Duration {
        Duration::from_millis(self.simulated_step_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default().with_env_overrides(env(&[])).unwrap();
        assert_eq!(config.concurrency, ConcurrencyPolicy::Replace);
        assert_eq!(config.feedback, FeedbackMode::Polling);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::default()
            .with_env_overrides(env(&[
                ("ARENA_API_URL", "https://judge.example.com"),
                ("ARENA_TOKEN", "secret"),
                ("ARENA_TIMEOUT_MS", "1500"),
                ("ARENA_FEEDBACK", "simulated"),
                ("ARENA_CONCURRENCY", "reject"),
            ]))
            .unwrap();

        assert_eq!(config.api_url, "https://judge.example.com");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout_ms, 1500);
        assert_eq!(config.feedback, FeedbackMode::Simulated);
        assert_eq!(config.concurrency, ConcurrencyPolicy::Reject);
    }

    #[test]
    fn test_empty_token_means_none() {
        let config = ClientConfig::default()
            .with_env_overrides(env(&[("ARENA_TOKEN", "")]))
            .unwrap();
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        assert!(ClientConfig::default()
            .with_env_overrides(env(&[("ARENA_TIMEOUT_MS", "soon")]))
            .is_err());
        assert!(ClientConfig::default()
            .with_env_overrides(env(&[("ARENA_FEEDBACK", "carrier-pigeon")]))
            .is_err());
        assert!(ClientConfig::default()
            .with_env_overrides(env(&[("ARENA_API_URL", "ftp://judge")]))
            .is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{ "api_url": "http://judge:9000", "feedback": "off" }"#)
                .unwrap();
        assert_eq!(config.api_url, "http://judge:9000");
        assert_eq!(config.feedback, FeedbackMode::Off);
        assert_eq!(config.poll_interval_ms, 1_000);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ClientConfig::load(Path::new("does/not/exist.json"));
        assert!(result.is_err());
    }
}
