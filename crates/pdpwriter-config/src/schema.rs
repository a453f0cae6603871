//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Model used when neither the template nor the settings name one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Resolved configuration, read fresh for every rewrite or status request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub use_mock: bool,

    #[serde(default = "default_model")]
    pub model: String,
}

impl Config {
    /// Mock-mode configuration with the default model.
    pub fn mock() -> Self {
        Self {
            api_key: String::new(),
            use_mock: true,
            model: default_model(),
        }
    }

    /// Live-mode configuration.
    pub fn live(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            use_mock: false,
            model: model.into(),
        }
    }

    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            use_mock: false,
            model: default_model(),
        }
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &if self.has_key() { "<set>" } else { "<empty>" })
            .field("use_mock", &self.use_mock)
            .field("model", &self.model)
            .finish()
    }
}

/// Defaults template.
#[derive(Clone, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub use_mock: bool,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub provider: ProviderDefaults,

    #[serde(default)]
    pub page: PageDefaults,

    #[serde(default)]
    pub mock: MockDefaults,

    #[serde(default)]
    pub worker: WorkerDefaults,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            use_mock: false,
            model: default_model(),
            provider: ProviderDefaults::default(),
            page: PageDefaults::default(),
            mock: MockDefaults::default(),
            worker: WorkerDefaults::default(),
        }
    }
}

impl std::fmt::Debug for Defaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Defaults")
            .field("api_key", &if self.api_key.is_empty() { "<empty>" } else { "<set>" })
            .field("use_mock", &self.use_mock)
            .field("model", &self.model)
            .field("provider", &self.provider)
            .field("page", &self.page)
            .field("mock", &self.mock)
            .field("worker", &self.worker)
            .finish()
    }
}

impl Defaults {
    /// Check values that would otherwise fail late at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(invalid("model", "must not be empty"));
        }

        let api_url = url::Url::parse(&self.provider.api_url)
            .map_err(|e| invalid("provider.api_url", &e.to_string()))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(invalid("provider.api_url", "must be an http(s) URL"));
        }

        if self.page.poll_interval_ms == 0 {
            return Err(invalid("page.poll_interval_ms", "must be positive"));
        }
        if self.worker.idle_timeout_secs == 0 {
            return Err(invalid("worker.idle_timeout_secs", "must be positive"));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Chat-completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDefaults {
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for ProviderDefaults {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

/// Page agent timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDefaults {
    /// How long to wait for each anchor element before scraping anyway.
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl PageDefaults {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            wait_timeout_ms: default_wait_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Mock-mode behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockDefaults {
    /// Simulated latency of a mock rewrite.
    #[serde(default = "default_mock_delay_ms")]
    pub delay_ms: u64,
}

impl MockDefaults {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for MockDefaults {
    fn default() -> Self {
        Self {
            delay_ms: default_mock_delay_ms(),
        }
    }
}

/// Background worker lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerDefaults {
    /// Idle time after which the worker stops when no keep-alive port is open.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl WorkerDefaults {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for WorkerDefaults {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_wait_timeout_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_mock_delay_ms() -> u64 {
    250
}

fn default_idle_timeout_secs() -> u64 {
    30
}
