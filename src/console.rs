//! Terminal rendering of the controller's status line and badge.

use pdpwriter_core::{Badge, StatusSink};

/// Writes status lines and the badge to stderr, keeping stdout for output.
pub(crate) struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn set_status(&self, text: &str) {
        eprintln!("{}", text);
    }

    fn set_badge(&self, badge: &Badge) {
        eprintln!("[{}] {}", badge.label(), badge.tooltip());
    }
}
