//! Selector tables.
//!
//! Each logical field maps to an ordered list of candidates. Site-specific
//! entries (Amazon, then MercadoLibre) come before generic ones; order is the
//! only tie-break.

use pdpwriter_protocols::Field;

/// How text is pulled out of a matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// Rendered visible text of the element.
    Text,
    /// One line per `li` item, skipping empty items. Falls back to
    /// [`Extractor::Text`] when the element has no items.
    BulletList,
}

/// A CSS selector paired with its extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelector {
    pub css: String,
    pub extractor: Extractor,
}

impl FieldSelector {
    pub fn text(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            extractor: Extractor::Text,
        }
    }

    pub fn bullets(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            extractor: Extractor::BulletList,
        }
    }
}

/// Ordered selector candidates for every field, plus the anchor elements the
/// page agent waits for before scraping.
#[derive(Debug, Clone)]
pub struct SelectorTable {
    title: Vec<FieldSelector>,
    description: Vec<FieldSelector>,
    shipping: Vec<FieldSelector>,
    returns: Vec<FieldSelector>,
    anchors: Vec<String>,
}

impl SelectorTable {
    /// A table with no candidates and no anchors.
    pub fn empty() -> Self {
        Self {
            title: Vec::new(),
            description: Vec::new(),
            shipping: Vec::new(),
            returns: Vec::new(),
            anchors: Vec::new(),
        }
    }

    pub fn for_field(&self, field: Field) -> &[FieldSelector] {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Shipping => &self.shipping,
            Field::Returns => &self.returns,
        }
    }

    pub fn anchors(&self) -> &[String] {
        &self.anchors
    }

    /// Replace the candidates of one field.
    pub fn with_field(mut self, field: Field, selectors: Vec<FieldSelector>) -> Self {
        match field {
            Field::Title => self.title = selectors,
            Field::Description => self.description = selectors,
            Field::Shipping => self.shipping = selectors,
            Field::Returns => self.returns = selectors,
        }
        self
    }

    pub fn with_anchors<I, S>(mut self, anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.anchors = anchors.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for SelectorTable {
    fn default() -> Self {
        let text = |list: &[&str]| -> Vec<FieldSelector> {
            list.iter().map(|css| FieldSelector::text(*css)).collect()
        };

        Self {
            title: text(&[
                "#productTitle",
                "h1.ui-pdp-title",
                "h1[itemprop=\"name\"]",
                "h1",
                ".product-title",
                "[itemprop=\"name\"]",
            ]),
            description: vec![
                FieldSelector::text("#productDescription"),
                FieldSelector::bullets("#feature-bullets"),
                FieldSelector::text("div.ui-pdp-description__content"),
                FieldSelector::text("div.ui-pdp-description"),
                FieldSelector::text(".product-description"),
                FieldSelector::text("[itemprop=\"description\"]"),
                FieldSelector::text("#description"),
            ],
            shipping: text(&[
                "#mir-layout-DELIVERY_BLOCK",
                ".shipping3P",
                "p.ui-pdp-delivery__shipping",
                "div.ui-pdp-shipping",
                ".shipping",
                ".shipping-info",
                "[data-shipping]",
                "#shipping",
            ]),
            returns: text(&[
                "#RETURNS_POLICY",
                ".returns-policy-message",
                "div.ui-pdp-return-policy",
                ".returns",
                ".returns-info",
                "[data-returns]",
                "#returns",
            ]),
            anchors: vec!["#productTitle".to_string(), "#feature-bullets".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_site_specific_first() {
        let table = SelectorTable::default();
        assert_eq!(table.for_field(Field::Title)[0].css, "#productTitle");
        assert_eq!(table.for_field(Field::Title)[1].css, "h1.ui-pdp-title");
        assert_eq!(table.for_field(Field::Returns)[0].css, "#RETURNS_POLICY");
        assert_eq!(table.for_field(Field::Shipping).last().unwrap().css, "#shipping");
    }

    #[test]
    fn test_default_table_feature_bullets_aggregate() {
        let table = SelectorTable::default();
        let bullets: Vec<_> = table
            .for_field(Field::Description)
            .iter()
            .filter(|s| s.extractor == Extractor::BulletList)
            .collect();
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].css, "#feature-bullets");
    }

    #[test]
    fn test_default_anchors() {
        let table = SelectorTable::default();
        assert_eq!(table.anchors(), ["#productTitle", "#feature-bullets"]);
    }

    #[test]
    fn test_with_field_and_anchors() {
        let table = SelectorTable::empty()
            .with_field(Field::Title, vec![FieldSelector::text(".name")])
            .with_anchors([".name"]);
        assert_eq!(table.for_field(Field::Title).len(), 1);
        assert!(table.for_field(Field::Description).is_empty());
        assert_eq!(table.anchors(), [".name"]);
    }
}
