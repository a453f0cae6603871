//! Field injection: overwrite the first element any candidate finds.

use tracing::debug;

use crate::document::Document;
use crate::selectors::FieldSelector;

/// Overwrite the visible text of the first element matched by any candidate.
///
/// The first element found is used whether or not it has content. An empty
/// `value` leaves the document untouched. Returns whether anything was
/// written; a miss is not an error.
pub fn inject(document: &mut Document, selectors: &[FieldSelector], value: &str) -> bool {
    if value.is_empty() {
        return false;
    }

    for selector in selectors {
        if document.overwrite_first(&selector.css, value) {
            debug!(selector = %selector.css, "Injected text");
            return true;
        }
    }

    debug!("No element found for injection");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::rendered_text;

    fn text_after(html: &str, css: &str) -> String {
        let doc = Document::parse(html);
        doc.select_first(css).map(rendered_text).unwrap_or_default()
    }

    #[test]
    fn test_inject_first_found_even_if_empty() {
        let mut doc = Document::parse("<div id=\"productDescription\"></div><div id=\"description\">Old</div>");
        let selectors = [
            FieldSelector::text("#productDescription"),
            FieldSelector::text("#description"),
        ];
        assert!(inject(&mut doc, &selectors, "New copy"));

        let html = doc.to_html();
        assert_eq!(text_after(&html, "#productDescription"), "New copy");
        assert_eq!(text_after(&html, "#description"), "Old");
    }

    #[test]
    fn test_inject_empty_value_is_noop() {
        let source = "<h1>Keep me</h1>";
        let mut doc = Document::parse(source);
        let before = doc.to_html();

        assert!(!inject(&mut doc, &[FieldSelector::text("h1")], ""));
        assert_eq!(doc.to_html(), before);
        assert_eq!(text_after(&doc.to_html(), "h1"), "Keep me");
    }

    #[test]
    fn test_inject_missing_element_is_silent() {
        let mut doc = Document::parse("<p>Body</p>");
        assert!(!inject(&mut doc, &[FieldSelector::text("#returns")], "30 days"));
        assert_eq!(text_after(&doc.to_html(), "p"), "Body");
    }

    #[test]
    fn test_inject_skips_invalid_selector() {
        let mut doc = Document::parse("<h1>Old</h1>");
        let selectors = [FieldSelector::text("h1[["), FieldSelector::text("h1")];
        assert!(inject(&mut doc, &selectors, "New"));
        assert_eq!(text_after(&doc.to_html(), "h1"), "New");
    }
}
