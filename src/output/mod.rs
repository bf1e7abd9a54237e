//! Output module for crawl summaries and reports
//!
//! This module handles:
//! - Collecting run statistics into a `CrawlSummary`
//! - Printing end-of-run statistics to the console
//! - Writing a markdown report next to the artifacts

mod markdown;
pub mod stats;
mod summary;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{format_statistics, print_statistics};
pub use summary::{CrawlSummary, OutputError, OutputResult};

use std::path::{Component, Path, PathBuf};

/// Writes the markdown report to `root/file_name`, returning its path
///
/// `file_name` must stay inside `root`.
pub fn write_run_report(
    summary: &CrawlSummary,
    root: &Path,
    file_name: &str,
) -> OutputResult<PathBuf> {
    let relative = Path::new(file_name);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(OutputError::InvalidPath(file_name.to_string()));
    }

    let path = root.join(relative);
    generate_markdown_summary(summary, &path)?;
    tracing::info!("Run report written to {}", path.display());
    Ok(path)
}
