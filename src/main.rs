//! Portal-Harvest main entry point
//!
//! This is the command-line interface for the Portal-Harvest crawler.

use anyhow::Context;
use clap::Parser;
use portal_harvest::config::{load_config_with_hash, Config};
use portal_harvest::crawler::Coordinator;
use portal_harvest::output::print_statistics;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Portal-Harvest: a breadth-first harvester for data portals
///
/// Crawls one portal host from its seed pages, saves the readable text and
/// tables of every page and downloads linked documents, extracting the text
/// of PDFs.
#[derive(Parser, Debug)]
#[command(name = "portal-harvest")]
#[command(version)]
#[command(about = "A breadth-first harvester for data portals", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, config_hash, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("portal_harvest=info,warn"),
            1 => EnvFilter::new("portal_harvest=debug,info"),
            2 => EnvFilter::new("portal_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Portal-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Domain: {}", config.crawler.domain);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Politeness delay: {}s", config.crawler.politeness_delay);
    println!(
        "  Timeouts: page {}s, document {}s",
        config.crawler.page_timeout, config.crawler.document_timeout
    );
    println!(
        "  Max document size: {} bytes",
        config.crawler.max_document_bytes
    );
    println!(
        "  Respect robots.txt: {}",
        config.crawler.respect_robots_txt
    );
    println!(
        "  Main content selectors: {}",
        config.crawler.main_content_selectors.join(", ")
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Root: {}", config.output.root.display());
    println!("  Collision policy: {:?}", config.output.collision_policy);
    if let Some(summary) = &config.output.summary_file {
        println!("  Summary: {}", summary);
    }

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        println!("  * {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        config.crawler.seeds.len()
    );
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: String, quiet: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} from {} seed URLs",
        config.crawler.domain,
        config.crawler.seeds.len()
    );

    let coordinator = Coordinator::new(config)
        .context("Failed to initialise crawler")?
        .with_config_hash(config_hash);

    // Ctrl-C stops dispatching; in-flight jobs finish
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight jobs");
            signal_token.cancel();
        }
    });

    let summary = coordinator.run(cancel).await.context("Crawl failed")?;

    if !quiet {
        println!();
        print_statistics(&summary);
    }

    Ok(())
}
