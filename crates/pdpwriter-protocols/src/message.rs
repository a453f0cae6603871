//! Message envelopes.
//!
//! Requests are internally tagged by `type`, matching the wire names used
//! between the controller, the page agent and the background worker:
//!
//! ```json
//! {"type": "scrapePDP"}
//! {"type": "replacePDP", "payload": {"title": "..."}}
//! {"type": "LLM_GENERATE", "payload": {"title": "...", "url": "..."}}
//! {"type": "GET_STATUS"}
//! {"type": "PING"}
//! ```
//!
//! Every reply is a [`Response`]: `{"ok": true, "data": ...}` or
//! `{"ok": false, "error": "..."}`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{RewrittenRecord, ScrapedRecord};

/// Request handled by the page agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PageRequest {
    /// Scrape the current page.
    #[serde(rename = "scrapePDP")]
    Scrape,
    /// Write rewritten copy into the current page.
    #[serde(rename = "replacePDP")]
    Replace { payload: RewrittenRecord },
}

impl PageRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            PageRequest::Scrape => "scrapePDP",
            PageRequest::Replace { .. } => "replacePDP",
        }
    }
}

/// Request handled by the background message router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RouterRequest {
    /// Rewrite a scraped record.
    #[serde(rename = "LLM_GENERATE")]
    Generate { payload: ScrapedRecord },
    /// Report the resolved mode, model and key presence.
    #[serde(rename = "GET_STATUS")]
    GetStatus,
    /// Liveness check.
    #[serde(rename = "PING")]
    Ping,
    /// Any type the router does not recognize.
    #[serde(other)]
    Unknown,
}

impl RouterRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            RouterRequest::Generate { .. } => "LLM_GENERATE",
            RouterRequest::GetStatus => "GET_STATUS",
            RouterRequest::Ping => "PING",
            RouterRequest::Unknown => "unknown",
        }
    }
}

/// Uniform reply envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// Successful reply carrying `data`.
    pub fn success(data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self {
                ok: true,
                data: Some(value),
                error: None,
            },
            Err(e) => Self::failure(format!("Failed to encode response: {}", e)),
        }
    }

    /// Successful reply without data.
    pub fn empty() -> Self {
        Self {
            ok: true,
            data: None,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Convert a fallible result, rendering the error with `Display`.
    pub fn from_result<T, E>(result: Result<T, E>) -> Self
    where
        T: Serialize,
        E: std::fmt::Display,
    {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }

    /// Decode the payload of a successful reply.
    ///
    /// A failed reply yields its error message, or `fallback` when it carries
    /// none.
    pub fn into_data<T: DeserializeOwned>(self, fallback: &str) -> Result<T, String> {
        if !self.ok {
            return Err(self
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| fallback.to_string()));
        }
        serde_json::from_value(self.data.unwrap_or(Value::Null))
            .map_err(|e| format!("Malformed response: {}", e))
    }
}

/// Payload of a `GET_STATUS` reply. Never carries the key itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    pub use_mock: bool,
    pub model: String,
    pub has_key: bool,
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
