//! Per-URL outcome definitions
//!
//! Every URL the coordinator touches ends in exactly one of these outcomes;
//! the run summary counts them.

use crate::FetchError;
use std::fmt;

/// Represents how the processing of one URL ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UrlOutcome {
    // ===== Success States =====
    /// Page was fetched, extracted and written
    PageSaved,

    /// Document was downloaded and written
    DocumentSaved,

    // ===== Skip States =====
    /// robots.txt disallows the URL
    RobotsDenied,

    /// Task was popped beyond the maximum crawl depth
    DepthExceeded,

    // ===== Error States =====
    /// Server answered 404 or 410
    DeadLink,

    /// Server answered with any other non-success status
    HttpError,

    /// Request did not complete within its timeout
    Timeout,

    /// Connection, DNS, TLS or body read failure
    Unreachable,

    /// Document body exceeded the configured size limit
    TooLarge,

    /// Artifact could not be written
    StorageFailed,
}

impl UrlOutcome {
    /// Returns true if this represents a saved artifact
    pub fn is_success(&self) -> bool {
        matches!(self, Self::PageSaved | Self::DocumentSaved)
    }

    /// Returns true if the URL was deliberately not fetched
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::RobotsDenied | Self::DepthExceeded)
    }

    /// Returns true if this represents a failure
    pub fn is_error(&self) -> bool {
        !self.is_success() && !self.is_skipped()
    }

    /// Classifies a fetch failure
    pub fn from_fetch_error(error: &FetchError) -> Self {
        match error {
            FetchError::Status {
                status: 404 | 410, ..
            } => Self::DeadLink,
            FetchError::Status { .. } => Self::HttpError,
            FetchError::Timeout { .. } => Self::Timeout,
            FetchError::Network { .. } => Self::Unreachable,
            FetchError::TooLarge { .. } => Self::TooLarge,
        }
    }

    /// Short label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageSaved => "page_saved",
            Self::DocumentSaved => "document_saved",
            Self::RobotsDenied => "robots_denied",
            Self::DepthExceeded => "depth_exceeded",
            Self::DeadLink => "dead_link",
            Self::HttpError => "http_error",
            Self::Timeout => "timeout",
            Self::Unreachable => "unreachable",
            Self::TooLarge => "too_large",
            Self::StorageFailed => "storage_failed",
        }
    }

    /// Returns all possible outcomes
    pub fn all() -> Vec<Self> {
        vec![
            Self::PageSaved,
            Self::DocumentSaved,
            Self::RobotsDenied,
            Self::DepthExceeded,
            Self::DeadLink,
            Self::HttpError,
            Self::Timeout,
            Self::Unreachable,
            Self::TooLarge,
            Self::StorageFailed,
        ]
    }
}

impl fmt::Display for UrlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
