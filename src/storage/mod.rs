//! Storage module for persisting crawl artifacts
//!
//! This module handles everything written to disk during a crawl:
//! - Deterministic file names derived from URLs
//! - The plain text layout of extracted pages
//! - The filesystem backend behind the `ArtifactStore` trait

mod fs;
mod traits;

pub use fs::{FsArtifactStore, DOCUMENTS_DIR, PAGES_DIR};
pub use traits::{ArtifactStore, StorageError, StorageResult};

use crate::extract::ExtractedPage;
use sha2::{Digest, Sha256};
use url::Url;

/// Replaces every character that is not a word character, `-` or `.` with `_`
pub fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File stem for a page, derived from its URL path
///
/// Leading and trailing slashes are stripped and the rest is sanitized, so
/// `/data/ocean/` becomes `data_ocean`. The root path maps to `index`.
pub fn derived_filename(url: &Url) -> String {
    let path = url.path().trim_matches('/');
    if path.is_empty() {
        return "index".to_string();
    }
    sanitize_component(path)
}

/// File name for a document: its last non-empty path segment, sanitized
pub fn document_filename(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    if segment.is_empty() {
        return None;
    }
    Some(sanitize_component(segment))
}

/// `-` followed by the first 8 hex characters of SHA-256 of the full URL
pub fn url_hash_suffix(url: &Url) -> String {
    let digest = Sha256::digest(url.as_str().as_bytes());
    format!("-{}", &hex::encode(digest)[..8])
}

/// Renders the text artifact of a page
pub fn render_page(url: &Url, page: &ExtractedPage) -> String {
    let mut out = format!(
        "URL: {}\n\n--- EXTRACTED TEXT ---\n{}\n\n--- EXTRACTED TABLES ---\n",
        url, page.text
    );
    // Debug formatting: double-quoted string lists
    for table in &page.tables {
        out.push_str(&format!("Headers: {:?}\n", table.headers));
        out.push_str(&format!("Data: {:?}\n", table.rows));
    }
    out
}
