//! Portal-Harvest: a breadth-first harvester for data portals
//!
//! This crate crawls a single portal host, extracts the readable text and
//! tables of every page, downloads linked documents (extracting text from
//! PDFs) and writes everything as plain text artifacts under one output root.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod robots;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Portal-Harvest operations
///
/// Only start-up failures surface through this type. Errors tied to a single
/// URL are contained by the coordinator and reported through logs and the
/// run summary.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Errors raised while retrieving a page or a document
///
/// Every variant carries the URL it was raised for, so a log line is enough
/// to tell which request failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Document at {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: u64 },
}

impl FetchError {
    /// The URL the failed request was made for
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. }
            | Self::Timeout { url }
            | Self::Network { url, .. }
            | Self::TooLarge { url, .. } => url,
        }
    }

    /// Classifies a transport error from reqwest
    pub(crate) fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Errors raised while pulling text out of a downloaded document
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF decode failed: {0}")]
    Pdf(String),

    #[error("PDF parser panicked: {0}")]
    Panic(String),
}

/// Result type alias for Portal-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlTask};
pub use extract::{ExtractedPage, Table};
pub use output::CrawlSummary;
pub use state::{CrawlPhase, UrlOutcome};
pub use crate::url::{extract_domain, normalize_url, LinkResolver, ResolvedLinks};
