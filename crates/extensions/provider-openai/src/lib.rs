//! OpenAI chat completions client for pdpwriter.

mod api;
mod client;

pub use api::{ApiMessage, ApiRequest, ApiResponse, ResponseFormat};
pub use client::{ChatClient, DEFAULT_API_URL};
