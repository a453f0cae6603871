//! Page agent: scrape and apply whole records.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use pdpwriter_protocols::{Field, PageRequest, Response, RewrittenRecord, ScrapedRecord};

use crate::document::Document;
use crate::error::PageError;
use crate::extract::extract;
use crate::inject::inject;
use crate::selectors::SelectorTable;
use crate::source::PageSource;

/// Bounded wait for anchor elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Per-anchor limit; scraping proceeds once it elapses.
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitOptions {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_millis(100))
    }
}

/// Scrapes product fields from a page and writes rewritten copy back.
pub struct PageAgent {
    page: Arc<dyn PageSource>,
    table: SelectorTable,
    wait: WaitOptions,
}

impl PageAgent {
    pub fn new(page: Arc<dyn PageSource>) -> Self {
        Self {
            page,
            table: SelectorTable::default(),
            wait: WaitOptions::default(),
        }
    }

    pub fn with_table(mut self, table: SelectorTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Poll until `css` matches or the wait times out.
    ///
    /// Returns whether the element appeared.
    pub async fn wait_for_selector(&self, css: &str) -> Result<bool, PageError> {
        let start = Instant::now();
        loop {
            let html = self.page.snapshot().await?;
            if page_contains(&html, css) {
                return Ok(true);
            }
            if start.elapsed() >= self.wait.timeout {
                return Ok(false);
            }
            sleep(self.wait.poll_interval).await;
        }
    }

    /// Scrape all four fields from the current page.
    ///
    /// Waits for each anchor element first; a timeout is not an error.
    pub async fn scrape(&self) -> Result<ScrapedRecord, PageError> {
        for anchor in self.table.anchors() {
            if !self.wait_for_selector(anchor).await? {
                debug!(anchor = %anchor, "Anchor did not appear, scraping anyway");
            }
        }

        let html = self.page.snapshot().await?;
        let record = self.extract_record(&html);

        let found: Vec<&str> = Field::ALL
            .iter()
            .filter(|f| !record.get(**f).is_empty())
            .map(|f| f.as_str())
            .collect();
        info!(url = ?record.url, fields = ?found, "Scraped page");
        if record.is_blank() {
            warn!("No product fields found on page");
        }

        Ok(record)
    }

    /// Write every non-empty field of `record` into the page.
    ///
    /// Returns the fields that found an element. The page is only committed
    /// when something was written.
    pub async fn apply(&self, record: &RewrittenRecord) -> Result<Vec<Field>, PageError> {
        let html = self.page.snapshot().await?;
        let (updated, written) = self.inject_record(&html, record);

        if written.is_empty() {
            debug!("Nothing to inject");
            return Ok(written);
        }

        self.page.commit(updated).await?;
        info!(fields = ?written, "Applied rewritten copy");
        Ok(written)
    }

    /// Dispatch a page request.
    pub async fn handle(&self, request: PageRequest) -> Response {
        match request {
            PageRequest::Scrape => Response::from_result(self.scrape().await),
            PageRequest::Replace { payload } => match self.apply(&payload).await {
                Ok(_) => Response::empty(),
                Err(e) => Response::failure(e.to_string()),
            },
        }
    }

    fn extract_record(&self, html: &str) -> ScrapedRecord {
        let document = Document::parse(html);
        let mut record = ScrapedRecord {
            url: self.page.url(),
            language: document.language(),
            ..Default::default()
        };
        for field in Field::ALL {
            record.set(field, extract(&document, self.table.for_field(field)));
        }
        record
    }

    fn inject_record(&self, html: &str, record: &RewrittenRecord) -> (String, Vec<Field>) {
        let mut document = Document::parse(html);
        let written: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|field| inject(&mut document, self.table.for_field(*field), record.get(*field)))
            .collect();
        (document.to_html(), written)
    }
}

fn page_contains(html: &str, css: &str) -> bool {
    Document::parse(html).contains(css)
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
