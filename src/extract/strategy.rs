//! Text extraction strategies
//!
//! A page's text comes from the first strategy in an ordered list that
//! applies to it. Portal-specific layouts get their own strategy instead of
//! another branch in the extractor.

use scraper::{ElementRef, Html, Selector};

/// Elements treated as text blocks inside a main-content container
///
/// Includes `span` and `div`: portal pages often hold copy directly in them.
/// A block nested in another block is emitted once per enclosing match.
const CONTAINER_BLOCKS: &str = "p, h1, h2, h3, li, span, div";

/// Elements treated as text blocks when no container is recognised
const DOCUMENT_BLOCKS: &str = "h1, h2, h3, p, li";

/// One way of pulling readable text out of a page
pub trait TextStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Returns the page text, or `None` if this strategy does not apply
    fn extract(&self, document: &Html) -> Option<String>;
}

/// Text of an element: its text nodes trimmed and joined by single spaces
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of each element on its own line, in iteration order
fn collect_blocks<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    let mut text = String::new();
    for element in elements {
        text.push_str(&element_text(element));
        text.push('\n');
    }
    text
}

/// Reads only the content of a recognised container element
#[derive(Debug, Clone)]
pub struct MainContentStrategy {
    css: String,
    container: Selector,
}

impl MainContentStrategy {
    /// Creates a strategy for a container selector; `None` if it does not parse
    pub fn new(css: &str) -> Option<Self> {
        let container = Selector::parse(css).ok()?;
        Some(Self {
            css: css.to_string(),
            container,
        })
    }
}

impl TextStrategy for MainContentStrategy {
    fn name(&self) -> &str {
        &self.css
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let container = document.select(&self.container).next()?;
        let blocks = Selector::parse(CONTAINER_BLOCKS).ok()?;

        let text = collect_blocks(container.select(&blocks));
        if text.is_empty() {
            // A container with bare text and no block markup
            let mut own = element_text(container);
            own.push('\n');
            return Some(own);
        }
        Some(text)
    }
}

/// Reads headings, paragraphs and list items across the whole document
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentFallbackStrategy;

impl TextStrategy for DocumentFallbackStrategy {
    fn name(&self) -> &str {
        "document"
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let blocks = Selector::parse(DOCUMENT_BLOCKS).ok()?;
        Some(collect_blocks(document.select(&blocks)))
    }
}
