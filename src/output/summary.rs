//! Run summary types
//!
//! This module defines the statistics gathered over one crawl run and the
//! error type for writing reports.

use crate::state::UrlOutcome;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Invalid report path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Summary statistics for a crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    // Run metadata
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub config_hash: String,
    pub domain: String,
    pub seeds: Vec<String>,
    pub max_depth: u32,
    pub cancelled: bool,

    /// Size of the visited set when the run ended
    pub unique_urls: usize,

    /// PDF documents whose text was extracted and written
    pub pdf_texts_extracted: u64,

    // Outcome breakdown (outcome -> count)
    pub outcomes: BTreeMap<UrlOutcome, u64>,

    // Pages fetched per depth (depth -> count)
    pub depth_breakdown: BTreeMap<u32, u64>,
}

impl CrawlSummary {
    /// Creates an empty summary for a run starting now
    pub fn new(config_hash: impl Into<String>) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            config_hash: config_hash.into(),
            domain: String::new(),
            seeds: Vec::new(),
            max_depth: 0,
            cancelled: false,
            unique_urls: 0,
            pdf_texts_extracted: 0,
            outcomes: BTreeMap::new(),
            depth_breakdown: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, outcome: UrlOutcome) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
    }

    pub fn record_depth(&mut self, depth: u32) {
        *self.depth_breakdown.entry(depth).or_insert(0) += 1;
    }

    /// Marks the run finished now
    pub fn finish(&mut self, unique_urls: usize, cancelled: bool) {
        self.finished_at = Some(Utc::now());
        self.unique_urls = unique_urls;
        self.cancelled = cancelled;
    }

    pub fn count(&self, outcome: UrlOutcome) -> u64 {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn pages_saved(&self) -> u64 {
        self.count(UrlOutcome::PageSaved)
    }

    pub fn documents_saved(&self) -> u64 {
        self.count(UrlOutcome::DocumentSaved)
    }

    /// Total number of URLs that ended in an error outcome
    pub fn total_errors(&self) -> u64 {
        self.outcomes
            .iter()
            .filter(|(outcome, _)| outcome.is_error())
            .map(|(_, count)| count)
            .sum()
    }

    /// Error outcomes with a non-zero count
    pub fn error_summary(&self) -> impl Iterator<Item = (UrlOutcome, u64)> + '_ {
        self.outcomes
            .iter()
            .filter(|(outcome, count)| outcome.is_error() && **count > 0)
            .map(|(outcome, count)| (*outcome, *count))
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    pub fn status(&self) -> &'static str {
        match (self.finished_at, self.cancelled) {
            (None, _) => "running",
            (Some(_), true) => "cancelled",
            (Some(_), false) => "completed",
        }
    }
}
