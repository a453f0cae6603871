//! Page sources.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::PageError;

/// Access to a live page's markup.
///
/// `snapshot` returns the page as it is right now; the agent polls it while
/// waiting for content to appear. `commit` replaces the page after injection.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Address of the page, when known.
    fn url(&self) -> Option<String>;

    async fn snapshot(&self) -> Result<String, PageError>;

    async fn commit(&self, html: String) -> Result<(), PageError>;
}

/// A page held in memory.
#[derive(Debug)]
pub struct HtmlPage {
    url: Option<String>,
    html: RwLock<String>,
}

impl HtmlPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            url: None,
            html: RwLock::new(html.into()),
        }
    }

    pub fn with_url(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            html: RwLock::new(html.into()),
        }
    }

    /// Current markup.
    pub fn html(&self) -> String {
        self.html.read().clone()
    }

    /// Replace the markup, as a page script would.
    pub fn set_html(&self, html: impl Into<String>) {
        *self.html.write() = html.into();
    }
}

#[async_trait]
impl PageSource for HtmlPage {
    fn url(&self) -> Option<String> {
        self.url.clone()
    }

    async fn snapshot(&self) -> Result<String, PageError> {
        Ok(self.html())
    }

    async fn commit(&self, html: String) -> Result<(), PageError> {
        self.set_html(html);
        Ok(())
    }
}
