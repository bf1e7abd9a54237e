//! URL handling module for Portal-Harvest
//!
//! This module provides URL normalization, the strict same-host filter, and
//! the link resolver that classifies discovered hrefs.

mod domain;
mod normalize;
mod resolver;

// Re-export main functions
pub use domain::{extract_domain, is_same_host};
pub use normalize::normalize_url;
pub use resolver::{
    classify_path, LinkKind, LinkResolver, ResolvedLinks, DOCUMENT_EXTENSIONS,
    EXCLUDED_EXTENSIONS,
};
