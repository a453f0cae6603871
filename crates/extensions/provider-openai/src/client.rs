//! Chat completions client.

use tracing::{debug, warn};

use pdpwriter_protocols::ProviderError;

use crate::api::{ApiRequest, ApiResponse};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Content returned when the reply carries no message.
const EMPTY_OBJECT: &str = "{}";

/// Client for an OpenAI-compatible chat completions endpoint.
///
/// The API key is passed per call so that settings changes apply to the next
/// request without rebuilding the client.
#[derive(Debug, Clone)]
pub struct ChatClient {
    api_url: String,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_API_URL)
    }

    /// Create a client for a custom endpoint (OpenAI-compatible APIs).
    pub fn with_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Send `request` and return the content of the first choice.
    ///
    /// A reply without choices, message or content yields `"{}"`. A body that
    /// is not JSON fails with [`ProviderError::InvalidResponse`].
    pub async fn complete(&self, api_key: &str, request: &ApiRequest) -> Result<String, ProviderError> {
        debug!(model = %request.model, url = %self.api_url, "Sending chat completion");
        let response = self.send_request(api_key, request).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let api_response: ApiResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if let Some(usage) = &api_response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion usage"
            );
        }

        Ok(api_response
            .first_content()
            .filter(|content| !content.is_empty())
            .unwrap_or(EMPTY_OBJECT)
            .to_string())
    }

    async fn send_request(
        &self,
        api_key: &str,
        request: &ApiRequest,
    ) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            warn!(status, "Chat completion failed");
            return Err(ProviderError::ApiError { status, message: text });
        }

        Ok(response)
    }
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
