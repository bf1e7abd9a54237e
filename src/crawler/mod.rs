//! Crawler module for page fetching and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of pages and documents
//! - The BFS frontier and the per-run visited set
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;

pub use coordinator::Coordinator;
pub use fetcher::{
    build_http_client, fetch_binary, fetch_page, FetchedPage, DOCUMENT_TIMEOUT, PAGE_TIMEOUT,
};
pub use frontier::{CrawlTask, Frontier, VisitedSet};

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::Result;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the output directories
/// 2. Build the HTTP client and seed the frontier
/// 3. Fetch pages breadth-first and download linked documents
/// 4. Return the run summary
pub async fn crawl(config: Config, cancel: CancellationToken) -> Result<CrawlSummary> {
    Coordinator::new(config)?.run(cancel).await
}
