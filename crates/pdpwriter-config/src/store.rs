//! Persisted user settings.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::ConfigError;
use crate::schema::DEFAULT_MODEL;

/// User settings as stored on disk.
///
/// Keys keep the names the settings surface has always written, so an
/// existing `settings.json` stays readable.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(rename = "OPENAI_API_KEY", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(rename = "USE_MOCK", default, skip_serializing_if = "Option::is_none")]
    pub use_mock: Option<bool>,

    #[serde(rename = "MODEL", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl StoredSettings {
    /// Settings as submitted from the settings form. Only the given values
    /// are set: the key is trimmed and an empty model falls back to the
    /// default one.
    pub fn from_form(api_key: Option<&str>, model: Option<&str>, use_mock: Option<bool>) -> Self {
        Self {
            api_key: api_key.map(|key| key.trim().to_string()),
            use_mock,
            model: model.map(|model| match model.trim() {
                "" => DEFAULT_MODEL.to_string(),
                model => model.to_string(),
            }),
        }
    }

    /// True when no key is set.
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.use_mock.is_none() && self.model.is_none()
    }

    /// Overlay the keys present in `other`.
    pub fn merge(&mut self, other: &StoredSettings) {
        if let Some(api_key) = &other.api_key {
            self.api_key = Some(api_key.clone());
        }
        if let Some(use_mock) = other.use_mock {
            self.use_mock = Some(use_mock);
        }
        if let Some(model) = &other.model {
            self.model = Some(model.clone());
        }
    }
}

impl std::fmt::Debug for StoredSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("use_mock", &self.use_mock)
            .field("model", &self.model)
            .finish()
    }
}

/// Key-value settings storage.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read all stored keys. Missing storage reads as empty settings.
    async fn load(&self) -> Result<StoredSettings, ConfigError>;

    /// Write the keys present in `settings`, leaving the others untouched.
    async fn save(&self, settings: &StoredSettings) -> Result<(), ConfigError>;
}

/// In-memory settings store for testing.
pub struct MemorySettingsStore {
    settings: tokio::sync::RwLock<StoredSettings>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::with_settings(StoredSettings::default())
    }

    pub fn with_settings(settings: StoredSettings) -> Self {
        Self {
            settings: tokio::sync::RwLock::new(settings),
        }
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<StoredSettings, ConfigError> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, settings: &StoredSettings) -> Result<(), ConfigError> {
        self.settings.write().await.merge(settings);
        Ok(())
    }
}

/// Settings persisted as a JSON object in `{data_dir}/settings.json`.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub const FILE_NAME: &'static str = "settings.json";

    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<StoredSettings, ConfigError> {
        if !fs::try_exists(&self.path).await? {
            debug!("No settings file at {:?}", self.path);
            return Ok(StoredSettings::default());
        }

        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(StoredSettings::default());
        }
        serde_json::from_str(&content).map_err(|e| {
            ConfigError::InvalidFormat(format!("{}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, settings: &StoredSettings) -> Result<(), ConfigError> {
        let mut current = self.load().await?;
        current.merge(settings);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&current)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        fs::write(&self.path, content).await?;

        debug!("Settings saved to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
