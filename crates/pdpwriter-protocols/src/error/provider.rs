//! Chat-completion provider errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The endpoint answered with a non-success status.
    #[error("LLM error: {status} {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    /// The response body was not JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
