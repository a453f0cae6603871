//! # pdpwriter Page
//!
//! Everything that runs against the product page itself:
//!
//! - [`SelectorTable`]: ordered selector candidates per field,
//! - [`extract`] / [`inject`]: first-match-wins field extraction and injection,
//! - [`PageAgent`]: scrape and apply whole records with a bounded wait,
//! - [`ContentScript`]: the agent behind a message channel, reached through a
//!   [`TabHandle`].

mod agent;
mod bridge;
mod document;
mod error;
mod extract;
mod inject;
mod selectors;
mod source;

pub use agent::{PageAgent, WaitOptions};
pub use bridge::{ContentScript, TabHandle};
pub use document::{raw_text, rendered_text, Document};
pub use error::PageError;
pub use extract::{bullet_text, extract, visible_text};
pub use inject::inject;
pub use selectors::{Extractor, FieldSelector, SelectorTable};
pub use source::{HtmlPage, PageSource};
