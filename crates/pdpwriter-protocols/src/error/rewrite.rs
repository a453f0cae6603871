//! Rewrite service errors.

use thiserror::Error;

use super::ProviderError;

#[derive(Debug, Error)]
pub enum RewriteError {
    /// Live mode was selected but no API key is configured.
    #[error("Missing API key. Set it with `pdpwriter settings --api-key` or in the defaults template")]
    MissingApiKey,

    /// The model reply was not valid JSON.
    #[error("Model did not return valid JSON.")]
    ModelResponse,

    /// The configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
