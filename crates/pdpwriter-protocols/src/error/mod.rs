//! Error types shared across pdpwriter contexts.

mod bridge;
mod provider;
mod rewrite;

pub use bridge::*;
pub use provider::*;
pub use rewrite::*;
