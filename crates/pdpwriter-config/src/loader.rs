//! Defaults template loader.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Defaults;

/// Template compiled into the binary.
const BUILTIN_DEFAULTS: &str = include_str!("../defaults.toml");

/// `${VAR}` or `${VAR:-fallback}`.
static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("env var pattern is valid")
});

/// Defaults loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the template embedded at build time.
    pub fn builtin() -> Result<Defaults, ConfigError> {
        Self::load_str(BUILTIN_DEFAULTS)
    }

    /// Load a template from a TOML file.
    pub fn load(path: &Path) -> Result<Defaults, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load a template from a string.
    pub fn load_str(content: &str) -> Result<Defaults, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let defaults: Defaults = toml::from_str(&expanded)?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// Expand `${VAR}` and `${VAR:-fallback}`. A bare `${VAR}` must be set.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_VAR.captures_iter(content) {
            let var_name = &cap[1];
            let value = match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => match cap.get(2) {
                    Some(fallback) => fallback.as_str().to_string(),
                    None => return Err(ConfigError::EnvVarNotSet(var_name.to_string())),
                },
            };
            result = result.replace(&cap[0], &value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.pdpwriter`).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Directory holding persisted settings and logs.
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pdpwriter")
    }
}
