//! Field extraction: the first selector yielding non-empty text wins.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use tracing::debug;

use crate::document::{raw_text, rendered_text, Document};
use crate::selectors::{Extractor, FieldSelector};

static LIST_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("li selector is valid"));

/// Text of the first candidate whose element yields non-empty text.
///
/// An element that is present but empty does not stop the scan. Returns an
/// empty string when no candidate produces text.
pub fn extract(document: &Document, selectors: &[FieldSelector]) -> String {
    for selector in selectors {
        let Some(element) = document.select_first(&selector.css) else {
            debug!(selector = %selector.css, "Selector not found");
            continue;
        };

        let text = match selector.extractor {
            Extractor::BulletList => bullet_text(element).unwrap_or_else(|| visible_text(element)),
            Extractor::Text => visible_text(element),
        };
        debug!(selector = %selector.css, chars = text.len(), "Selector matched");

        if !text.is_empty() {
            return text;
        }
    }
    String::new()
}

/// Rendered text, or the raw text content when nothing renders.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let rendered = rendered_text(element);
    if rendered.is_empty() {
        raw_text(element)
    } else {
        rendered
    }
}

/// One line per `li` item, skipping empty ones. `None` when the element has
/// no items at all.
pub fn bullet_text(element: ElementRef<'_>) -> Option<String> {
    let items: Vec<_> = element.select(&LIST_ITEM).collect();
    if items.is_empty() {
        return None;
    }

    let lines: Vec<String> = items
        .into_iter()
        .map(visible_text)
        .filter(|line| !line.is_empty())
        .collect();
    Some(lines.join("\n"))
}
