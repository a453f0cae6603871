//! Cross-context messaging errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The page has no listening content script, typically because it was
    /// not reloaded after the agent started.
    #[error("Content script not found. Please refresh the page and try again.")]
    ContentScriptUnavailable,

    /// The background worker went away before replying.
    #[error("Could not establish connection. Receiving end does not exist.")]
    BackgroundUnavailable,
}
