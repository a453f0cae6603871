//! Controller: the apply and preview flows plus the mode badge.
//!
//! Each flow awaits one stage before starting the next and stops at the first
//! failure, rendering its message as the status line.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{error, info};

use pdpwriter_page::TabHandle;
use pdpwriter_protocols::{
    PageRequest, Response, RewrittenRecord, RouterRequest, ScrapedRecord, StatusInfo,
};

use crate::worker::BackgroundHandle;

pub const STATUS_SCRAPING: &str = "Scraping page...";
pub const STATUS_CALLING: &str = "Calling LLM...";
pub const STATUS_REPLACING: &str = "Replacing content...";
pub const STATUS_DONE: &str = "Done ✅";
pub const STATUS_NO_TAB: &str = "No active tab";

/// Why a flow did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("No active tab")]
    NoActiveTab,

    #[error("Another operation is already in progress.")]
    Busy,

    /// A stage failed; the message is shown verbatim.
    #[error("{0}")]
    Failed(String),
}

/// Mode indicator shown next to the controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badge {
    Mock,
    NeedsKey,
    Live { model: String },
    Unavailable,
}

impl Badge {
    pub fn from_status(status: &StatusInfo) -> Self {
        if status.use_mock {
            Badge::Mock
        } else if !status.has_key {
            Badge::NeedsKey
        } else {
            Badge::Live {
                model: status.model.clone(),
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Mock => "MOCK",
            Badge::NeedsKey => "NEEDS KEY",
            Badge::Live { .. } => "LIVE",
            Badge::Unavailable => "…",
        }
    }

    pub fn tooltip(&self) -> String {
        match self {
            Badge::Mock => "Mock Mode: no API calls".to_string(),
            Badge::NeedsKey => "Set your API key with `pdpwriter settings --api-key`".to_string(),
            Badge::Live { model } => format!("Live mode • Model: {}", model),
            Badge::Unavailable => "Status unavailable".to_string(),
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the controller renders its status line and badge.
pub trait StatusSink: Send + Sync {
    fn set_status(&self, text: &str);

    fn set_badge(&self, badge: &Badge);
}

/// A sink that remembers everything it was shown.
#[derive(Default)]
pub struct RecordingSink {
    statuses: Mutex<Vec<String>>,
    badge: Mutex<Option<Badge>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().clone()
    }

    pub fn last_status(&self) -> Option<String> {
        self.statuses.lock().last().cloned()
    }

    pub fn badge(&self) -> Option<Badge> {
        self.badge.lock().clone()
    }
}

impl StatusSink for RecordingSink {
    fn set_status(&self, text: &str) {
        self.statuses.lock().push(text.to_string());
    }

    fn set_badge(&self, badge: &Badge) {
        *self.badge.lock() = Some(badge.clone());
    }
}

/// Clears the busy flag when a flow ends, however it ends.
struct FlowGuard<'a>(&'a AtomicBool);

impl Drop for FlowGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Controller {
    tab: Option<TabHandle>,
    background: BackgroundHandle,
    sink: Arc<dyn StatusSink>,
    busy: AtomicBool,
}

impl Controller {
    pub fn new(tab: Option<TabHandle>, background: BackgroundHandle, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            tab,
            background,
            sink,
            busy: AtomicBool::new(false),
        }
    }

    /// Scrape, rewrite and write the result back into the page.
    pub async fn apply(&self) -> Result<RewrittenRecord, ControllerError> {
        let _guard = self.begin()?;
        self.sink.set_status(STATUS_SCRAPING);
        let tab = self.active_tab()?;

        let result = self.run_apply(tab).await;
        match &result {
            Ok(_) => self.sink.set_status(STATUS_DONE),
            Err(e) => self.fail(e),
        }
        self.refresh_badge().await;
        result
    }

    /// Scrape and rewrite, then show the result without touching the page.
    pub async fn preview(&self) -> Result<RewrittenRecord, ControllerError> {
        let _guard = self.begin()?;
        self.sink.set_status(STATUS_SCRAPING);
        let tab = self.active_tab()?;

        let result = self.run_preview(tab).await;
        match &result {
            Ok(record) => match serde_json::to_string_pretty(record) {
                Ok(pretty) => self.sink.set_status(&format!("Preview:\n{}", pretty)),
                Err(e) => self.fail(&ControllerError::Failed(e.to_string())),
            },
            Err(e) => self.fail(e),
        }
        self.refresh_badge().await;
        result
    }

    /// Ask the background worker for its status and update the badge.
    pub async fn refresh_badge(&self) -> Badge {
        let badge = match self.background.send(RouterRequest::GetStatus).await {
            Ok(response) => match response.into_data::<StatusInfo>("status error") {
                Ok(status) => Badge::from_status(&status),
                Err(_) => Badge::Unavailable,
            },
            Err(_) => Badge::Unavailable,
        };
        self.sink.set_badge(&badge);
        badge
    }

    async fn run_apply(&self, tab: &TabHandle) -> Result<RewrittenRecord, ControllerError> {
        let scraped = self.scrape(tab).await?;

        self.sink.set_status(STATUS_CALLING);
        let rewritten = self.generate(scraped, "LLM failed: ").await?;

        self.sink.set_status(STATUS_REPLACING);
        info!("Replacing page content");
        let response = tab
            .send(PageRequest::Replace {
                payload: rewritten.clone(),
            })
            .await
            .map_err(|e| ControllerError::Failed(e.to_string()))?;
        expect_ok(response, "Replace failed")?;

        Ok(rewritten)
    }

    async fn run_preview(&self, tab: &TabHandle) -> Result<RewrittenRecord, ControllerError> {
        let scraped = self.scrape(tab).await?;
        self.generate(scraped, "LLM failed").await
    }

    async fn scrape(&self, tab: &TabHandle) -> Result<ScrapedRecord, ControllerError> {
        info!(url = ?tab.url(), "Scraping page");
        let response = tab
            .send(PageRequest::Scrape)
            .await
            .map_err(|e| ControllerError::Failed(e.to_string()))?;
        response
            .into_data("Scrape failed")
            .map_err(ControllerError::Failed)
    }

    async fn generate(
        &self,
        scraped: ScrapedRecord,
        fallback: &str,
    ) -> Result<RewrittenRecord, ControllerError> {
        info!("Requesting rewrite");
        let _port = self.background.connect();
        let response = self
            .background
            .send(RouterRequest::Generate { payload: scraped })
            .await
            .map_err(|e| ControllerError::Failed(e.to_string()))?;
        response.into_data(fallback).map_err(ControllerError::Failed)
    }

    fn begin(&self) -> Result<FlowGuard<'_>, ControllerError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(ControllerError::Busy);
        }
        Ok(FlowGuard(&self.busy))
    }

    fn active_tab(&self) -> Result<&TabHandle, ControllerError> {
        self.tab.as_ref().ok_or_else(|| {
            self.sink.set_status(STATUS_NO_TAB);
            ControllerError::NoActiveTab
        })
    }

    fn fail(&self, e: &ControllerError) {
        error!(error = %e, "Flow failed");
        self.sink.set_status(&format!("Error: {}", e));
    }
}

fn expect_ok(response: Response, fallback: &str) -> Result<(), ControllerError> {
    if response.ok {
        return Ok(());
    }
    Err(ControllerError::Failed(
        response
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| fallback.to_string()),
    ))
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
