//! Markdown summary generation
//!
//! This module generates a human-readable markdown report of a crawl run.

use crate::output::summary::{CrawlSummary, OutputResult};
use crate::state::UrlOutcome;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report of `summary` to `output_path`
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Portal-Harvest Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Domain**: {}\n", summary.domain));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    if let Some(finished) = summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = summary.duration_seconds() {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **Status**: {}\n", summary.status()));
    md.push_str(&format!("- **Max Depth**: {}\n", summary.max_depth));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    if !summary.seeds.is_empty() {
        md.push_str("### Seeds\n\n");
        for seed in &summary.seeds {
            md.push_str(&format!("- {}\n", seed));
        }
        md.push('\n');
    }

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Unique URLs**: {}\n", summary.unique_urls));
    md.push_str(&format!("- **Pages Saved**: {}\n", summary.pages_saved()));
    md.push_str(&format!(
        "- **Documents Saved**: {}\n",
        summary.documents_saved()
    ));
    md.push_str(&format!(
        "- **PDF Texts Extracted**: {}\n",
        summary.pdf_texts_extracted
    ));
    md.push_str(&format!("- **Total Errors**: {}\n\n", summary.total_errors()));

    // Outcome breakdown
    md.push_str("## Outcome Breakdown\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    for outcome in UrlOutcome::all() {
        md.push_str(&format!("| {} | {} |\n", outcome, summary.count(outcome)));
    }
    md.push('\n');

    // Depth breakdown
    if !summary.depth_breakdown.is_empty() {
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (depth, count) in &summary.depth_breakdown {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
        md.push('\n');
    }

    md
}
