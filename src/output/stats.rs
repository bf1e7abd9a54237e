//! Console statistics for a finished run

use crate::output::summary::CrawlSummary;

/// Renders the end-of-run statistics shown on the console
pub fn format_statistics(summary: &CrawlSummary) -> String {
    let mut out = String::from("=== Crawl Statistics ===\n\n");

    out.push_str(&format!("Status: {}\n", summary.status()));
    if let Some(duration) = summary.duration_seconds() {
        out.push_str(&format!("Duration: {}s\n", duration));
    }
    out.push('\n');

    out.push_str(&format!(
        "Total unique URLs/Documents processed: {}\n",
        summary.unique_urls
    ));
    out.push_str(&format!("  Pages saved: {}\n", summary.pages_saved()));
    out.push_str(&format!("  Documents saved: {}\n", summary.documents_saved()));
    out.push_str(&format!(
        "  PDF texts extracted: {}\n",
        summary.pdf_texts_extracted
    ));

    if summary.total_errors() > 0 {
        out.push_str("\nFailures:\n");
        // Most frequent first
        let mut errors: Vec<_> = summary.error_summary().collect();
        errors.sort_by(|a, b| b.1.cmp(&a.1));
        for (outcome, count) in errors {
            out.push_str(&format!("  {}: {}\n", outcome, count));
        }
    }

    out
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(summary: &CrawlSummary) {
    print!("{}", format_statistics(summary));
}
