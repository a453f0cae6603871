//! Page errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    /// The page went away while the agent was working on it.
    #[error("Page closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
