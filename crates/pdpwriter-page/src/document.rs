//! Parsed page document.
//!
//! `scraper` documents are `!Send`: parse, read and modify them inside a
//! synchronous scope and never hold one across an `.await`.

use scraper::node::Text;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

/// Elements whose content never renders.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start and end on their own line.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "option", "p", "pre", "section", "table", "tr", "ul",
];

/// Table cells; adjacent cells are separated by a tab.
const CELL_TAGS: &[&str] = &["td", "th"];

/// Brackets placeholders for injected text until serialization. Private-use
/// characters pass through the serializer unescaped.
const MARKER: char = '\u{E000}';

/// An HTML document with pending text replacements.
pub struct Document {
    html: Html,
    replacements: Vec<(String, String)>,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            replacements: Vec::new(),
        }
    }

    /// First element matching `css`. Invalid selectors match nothing.
    pub fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = parse_selector(css)?;
        let first = self.html.select(&selector).next();
        first
    }

    pub fn contains(&self, css: &str) -> bool {
        self.select_first(css).is_some()
    }

    /// Value of `<html lang>`, if present and non-empty.
    pub fn language(&self) -> Option<String> {
        self.html
            .root_element()
            .value()
            .attr("lang")
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .map(str::to_string)
    }

    /// Replace the content of the first element matching `css` with `value`.
    ///
    /// Line breaks in `value` become `<br>`. Table sections and `tr` get
    /// rows and cells instead (one row per line, one cell per tab) and a
    /// `select` gets one option per line, so the content re-parses in place.
    /// Returns `false` when nothing matches.
    pub fn overwrite_first(&mut self, css: &str, value: &str) -> bool {
        let Some((id, encoded)) = self
            .select_first(css)
            .map(|element| (element.id(), encode_content(element.value().name(), value)))
        else {
            return false;
        };

        let children: Vec<_> = match self.html.tree.get(id) {
            Some(node) => node.children().map(|child| child.id()).collect(),
            None => return false,
        };
        for child in children {
            if let Some(mut node) = self.html.tree.get_mut(child) {
                node.detach();
            }
        }

        let marker = format!("{MARKER}{}{MARKER}", self.replacements.len());
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.append(Node::Text(Text {
                text: marker.as_str().into(),
            }));
        }
        self.replacements.push((marker, encoded));
        true
    }

    /// Serialize the document, including every replacement.
    pub fn to_html(&self) -> String {
        let mut out = self.html.html();
        for (marker, encoded) in &self.replacements {
            out = out.replace(marker.as_str(), encoded);
        }
        out
    }
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(selector = css, "Skipping invalid selector: {:?}", e);
            None
        }
    }
}

/// Markup for `value` as the content of a `tag` element.
fn encode_content(tag: &str, value: &str) -> String {
    let value = value.replace("\r\n", "\n");
    match tag {
        "table" => format!("<tbody>{}</tbody>", encode_rows(&value)),
        "tbody" | "thead" | "tfoot" => encode_rows(&value),
        "tr" => encode_cells(&value),
        "select" => value
            .lines()
            .map(|line| format!("<option>{}</option>", escape(line)))
            .collect(),
        _ => encode_text(&value),
    }
}

fn encode_rows(value: &str) -> String {
    value
        .lines()
        .map(|line| format!("<tr>{}</tr>", encode_cells(line)))
        .collect()
}

fn encode_cells(value: &str) -> String {
    value
        .split('\t')
        .map(|cell| format!("<td>{}</td>", encode_text(cell)))
        .collect()
}

/// Escape text for element content; newlines become `<br>`.
fn encode_text(value: &str) -> String {
    escape(value).replace('\n', "<br>")
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Visible text of an element, laid out the way a browser renders it:
/// whitespace runs collapse, `<br>` breaks the line, block elements sit on
/// their own lines, adjacent table cells are tab-separated and hidden content
/// is skipped.
pub fn rendered_text(element: ElementRef<'_>) -> String {
    let mut buf = TextBuf::default();
    walk(element, &mut buf);
    buf.finish()
}

/// Concatenated text nodes of an element, trimmed.
pub fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn walk(element: ElementRef<'_>, buf: &mut TextBuf) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => buf.push_text(text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child.value().name();
                if SKIPPED_TAGS.contains(&name) || is_hidden(&child) {
                    continue;
                }
                if name == "br" {
                    buf.hard_break();
                    continue;
                }
                if CELL_TAGS.contains(&name) && follows_cell(&child) {
                    buf.cell_break();
                }
                let block = BLOCK_TAGS.contains(&name);
                if block {
                    buf.soft_break();
                }
                walk(child, buf);
                if block {
                    buf.soft_break();
                }
            }
            _ => {}
        }
    }
}

fn follows_cell(element: &ElementRef<'_>) -> bool {
    element
        .prev_siblings()
        .find_map(ElementRef::wrap)
        .is_some_and(|prev| CELL_TAGS.contains(&prev.value().name()))
}

fn is_hidden(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    if value.attr("hidden").is_some() || value.attr("aria-hidden") == Some("true") {
        return true;
    }
    value.attr("style").is_some_and(|style| {
        let style: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        style.contains("display:none") || style.contains("visibility:hidden")
    })
}

#[derive(Default)]
struct TextBuf {
    out: String,
}

impl TextBuf {
    fn push_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                if !self.out.is_empty() && !self.out.ends_with(&[' ', '\n', '\t'][..]) {
                    self.out.push(' ');
                }
            } else {
                self.out.push(ch);
            }
        }
    }

    /// Line break that never produces an empty line.
    fn soft_break(&mut self) {
        self.trim_trailing_spaces();
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn hard_break(&mut self) {
        self.trim_trailing_spaces();
        self.out.push('\n');
    }

    fn cell_break(&mut self) {
        self.trim_trailing_spaces();
        self.out.push('\t');
    }

    fn trim_trailing_spaces(&mut self) {
        let len = self.out.trim_end_matches(' ').len();
        self.out.truncate(len);
    }

    fn finish(self) -> String {
        self.out.trim().to_string()
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
