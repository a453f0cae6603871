//! Config resolution: template defaults overridden by stored settings.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ConfigError;
use crate::schema::{Config, Defaults};
use crate::store::{SettingsStore, StoredSettings};

/// Source of the current [`Config`].
///
/// Implementations are asked on every operation; nothing is cached.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn load(&self) -> Result<Config, ConfigError>;
}

/// A fixed config, mostly useful in tests.
#[async_trait]
impl ConfigSource for Config {
    async fn load(&self) -> Result<Config, ConfigError> {
        Ok(self.clone())
    }
}

/// Merges the defaults template with a settings store.
pub struct ConfigResolver {
    defaults: Defaults,
    store: Arc<dyn SettingsStore>,
}

impl ConfigResolver {
    pub fn new(defaults: Defaults, store: Arc<dyn SettingsStore>) -> Self {
        Self { defaults, store }
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    /// Stored values win over the template; empty stored strings count as
    /// unset.
    pub fn resolve(defaults: &Defaults, stored: &StoredSettings) -> Config {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Config {
            api_key: non_empty(&stored.api_key).unwrap_or_else(|| defaults.api_key.clone()),
            use_mock: stored.use_mock.unwrap_or(defaults.use_mock),
            model: non_empty(&stored.model).unwrap_or_else(|| defaults.model.clone()),
        }
    }
}

#[async_trait]
impl ConfigSource for ConfigResolver {
    async fn load(&self) -> Result<Config, ConfigError> {
        let stored = self.store.load().await?;
        Ok(Self::resolve(&self.defaults, &stored))
    }
}
