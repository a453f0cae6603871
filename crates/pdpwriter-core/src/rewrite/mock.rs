//! Deterministic offline rewrite.

use pdpwriter_protocols::{RewrittenRecord, ScrapedRecord};

const FALLBACK_TITLE: &str = "Sample Product";
const FALLBACK_DESCRIPTION: &str = "This is a sample product description.";
const DESCRIPTION_BULLETS: &str = "• Benefits-focused copy\n• Clear formatting\n• SEO-friendly phrasing";
const SHIPPING: &str = "• Standard shipping 3–5 business days\n• Expedited options at checkout";
const RETURNS: &str = "• 30-day returns on unused items\n• Easy exchanges via the returns portal";

/// Synthesize copy from `input` without a network call.
///
/// Always yields four non-empty fields.
pub fn rewrite(input: &ScrapedRecord) -> RewrittenRecord {
    let title = non_empty_or(&input.title, FALLBACK_TITLE);
    let description = non_empty_or(&input.description, FALLBACK_DESCRIPTION);

    RewrittenRecord {
        title: format!("{title} — Enhanced"),
        description: format!("{description}\n\n{DESCRIPTION_BULLETS}"),
        shipping: SHIPPING.to_string(),
        returns: RETURNS.to_string(),
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    match value.trim() {
        "" => fallback,
        trimmed => trimmed,
    }
}
