//! Content extraction module
//!
//! This module turns fetched bytes into the text that ends up in the
//! artifact store:
//! - HTML pages into normalized text blocks and tables
//! - PDF documents into plain text

mod document;
mod page;
mod strategy;
mod table;

pub use document::{extract_pdf_text, is_pdf, try_extract_pdf_text};
pub use page::PageExtractor;
pub use strategy::{element_text, DocumentFallbackStrategy, MainContentStrategy, TextStrategy};
pub use table::extract_tables;

use url::Url;

/// A table lifted out of a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Header cell texts, possibly empty
    pub headers: Vec<String>,
    /// Data rows; rows without any data cell are never stored
    pub rows: Vec<Vec<String>>,
}

/// Everything kept from one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub url: Url,
    /// Text blocks, each terminated by a newline, in document order
    pub text: String,
    pub tables: Vec<Table>,
}
