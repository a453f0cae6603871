//! Product-page records exchanged between contexts.

use serde::{Deserialize, Serialize};

/// Logical field of a product-detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Description,
    Shipping,
    Returns,
}

impl Field {
    /// All fields in page order.
    pub const ALL: [Field; 4] = [
        Field::Title,
        Field::Description,
        Field::Shipping,
        Field::Returns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Shipping => "shipping",
            Field::Returns => "returns",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text scraped from a product page.
///
/// Any of the four text fields may be empty when the page has no matching
/// element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub shipping: String,
    #[serde(default)]
    pub returns: String,
}

impl ScrapedRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Shipping => &self.shipping,
            Field::Returns => &self.returns,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Title => self.title = value,
            Field::Description => self.description = value,
            Field::Shipping => self.shipping = value,
            Field::Returns => self.returns = value,
        }
    }

    /// True when no text field carries content.
    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).trim().is_empty())
    }

    /// Drop the page metadata, keeping the text as-is.
    ///
    /// Used when the scraped text is written back unchanged.
    pub fn to_rewritten(&self) -> RewrittenRecord {
        RewrittenRecord {
            title: self.title.clone(),
            description: self.description.clone(),
            shipping: self.shipping.clone(),
            returns: self.returns.clone(),
        }
    }
}

/// Rewritten copy for a product page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewrittenRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub shipping: String,
    #[serde(default)]
    pub returns: String,
}

impl RewrittenRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Shipping => &self.shipping,
            Field::Returns => &self.returns,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Title => self.title = value,
            Field::Description => self.description = value,
            Field::Shipping => self.shipping = value,
            Field::Returns => self.returns = value,
        }
    }
}
