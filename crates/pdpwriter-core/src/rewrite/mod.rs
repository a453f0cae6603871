//! Rewrite service.
//!
//! Mock mode synthesizes copy locally. Live mode sends the scraped record to
//! the chat completions endpoint and merges the reply over the input. The
//! configuration is read for every call, so settings changes apply to the
//! next request.

pub mod mock;
pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use pdpwriter_config::ConfigSource;
use pdpwriter_protocols::{
    ProviderError, RewriteError, RewrittenRecord, ScrapedRecord, StatusInfo,
};
use pdpwriter_provider_openai::ChatClient;

/// Simulated latency of a mock rewrite.
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(250);

pub struct RewriteService {
    config: Arc<dyn ConfigSource>,
    client: ChatClient,
    mock_delay: Duration,
}

impl RewriteService {
    pub fn new(config: Arc<dyn ConfigSource>, client: ChatClient) -> Self {
        Self {
            config,
            client,
            mock_delay: DEFAULT_MOCK_DELAY,
        }
    }

    pub fn with_mock_delay(mut self, delay: Duration) -> Self {
        self.mock_delay = delay;
        self
    }

    /// Mode, model and key presence. The key itself is never returned.
    pub async fn status(&self) -> Result<StatusInfo, RewriteError> {
        let config = self
            .config
            .load()
            .await
            .map_err(|e| RewriteError::Config(e.to_string()))?;
        Ok(StatusInfo {
            use_mock: config.use_mock,
            has_key: config.has_key(),
            model: config.model,
        })
    }

    /// Rewrite `input` in the configured mode.
    pub async fn rewrite(&self, input: &ScrapedRecord) -> Result<RewrittenRecord, RewriteError> {
        let config = self
            .config
            .load()
            .await
            .map_err(|e| RewriteError::Config(e.to_string()))?;
        debug!(config = ?config, "Loaded config for rewrite");

        if config.use_mock {
            info!("Using mock mode");
            tokio::time::sleep(self.mock_delay).await;
            return Ok(mock::rewrite(input));
        }

        if !config.has_key() {
            return Err(RewriteError::MissingApiKey);
        }

        info!(model = %config.model, "Calling chat completions");
        let request = prompt::build_request(&config.model, input);
        let content = self
            .client
            .complete(config.api_key.trim(), &request)
            .await
            .map_err(|e| match e {
                ProviderError::InvalidResponse(detail) => {
                    warn!(error = %detail, "Unreadable chat completion body");
                    RewriteError::ModelResponse
                }
                other => RewriteError::Provider(other),
            })?;
        prompt::merge_reply(&content, input)
    }
}

#[cfg(test)]
#[path = "rewrite_tests.rs"]
mod tests;
