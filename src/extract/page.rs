//! HTML page extraction

use super::strategy::{DocumentFallbackStrategy, MainContentStrategy, TextStrategy};
use super::table::extract_tables;
use super::ExtractedPage;
use scraper::{Html, Selector};
use url::Url;

/// Turns HTML into an [`ExtractedPage`] plus the raw link targets it contains
pub struct PageExtractor {
    strategies: Vec<Box<dyn TextStrategy>>,
}

impl PageExtractor {
    /// Uses `strategies` in order; the whole-document fallback is always last
    pub fn new(mut strategies: Vec<Box<dyn TextStrategy>>) -> Self {
        strategies.push(Box::new(DocumentFallbackStrategy));
        Self { strategies }
    }

    /// One main-content strategy per container selector, in order
    ///
    /// Selectors that do not parse are skipped with a warning.
    pub fn from_selectors(selectors: &[String]) -> Self {
        let strategies = selectors
            .iter()
            .filter_map(|css| {
                let strategy = MainContentStrategy::new(css);
                if strategy.is_none() {
                    tracing::warn!("Ignoring invalid main content selector: {}", css);
                }
                strategy
            })
            .map(|s| Box::new(s) as Box<dyn TextStrategy>)
            .collect();
        Self::new(strategies)
    }

    /// Extracts text and tables from `html`
    pub fn extract(&self, url: &Url, html: &str) -> ExtractedPage {
        let document = self.parse(url, html);
        self.extract_from(url, &document)
    }

    /// Extracts the page and its `a[href]` values with a single parse
    pub fn extract_with_links(&self, url: &Url, html: &str) -> (ExtractedPage, Vec<String>) {
        let document = self.parse(url, html);
        let page = self.extract_from(url, &document);
        (page, hrefs(&document))
    }

    fn parse(&self, url: &Url, html: &str) -> Html {
        let document = Html::parse_document(html);
        if !document.errors.is_empty() {
            tracing::debug!(
                "Recovered from {} HTML parse errors on {}",
                document.errors.len(),
                url
            );
        }
        document
    }

    fn extract_from(&self, url: &Url, document: &Html) -> ExtractedPage {
        let text = self
            .strategies
            .iter()
            .find_map(|strategy| {
                let text = strategy.extract(document)?;
                tracing::trace!("Text for {} taken by strategy {}", url, strategy.name());
                Some(text)
            })
            .unwrap_or_default();

        ExtractedPage {
            url: url.clone(),
            text,
            tables: extract_tables(document),
        }
    }
}

impl Default for PageExtractor {
    fn default() -> Self {
        Self::from_selectors(&["div.main-content".to_string()])
    }
}

/// `href` values of all anchors, in document order
fn hrefs(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}
