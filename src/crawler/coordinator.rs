//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier and owning the visited set
//! - Dispatching page and document jobs to a bounded worker pool
//! - Resolving discovered links and enforcing the depth ceiling
//! - Politeness delays, robots.txt and cancellation
//! - Building the run summary

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_binary, fetch_page};
use crate::crawler::frontier::{CrawlTask, Frontier, VisitedSet};
use crate::extract::{extract_pdf_text, is_pdf, PageExtractor};
use crate::output::{write_run_report, CrawlSummary};
use crate::robots::{fetch_robots, ParsedRobots};
use crate::state::{CrawlPhase, UrlOutcome};
use crate::storage::{ArtifactStore, FsArtifactStore};
use crate::url::{normalize_url, LinkResolver};
use crate::Result;
use reqwest::Client;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Pages between two progress log lines
const PROGRESS_INTERVAL: u64 = 10;

/// Unit of work handed to the worker pool
#[derive(Debug, Clone)]
enum Job {
    Page(CrawlTask),
    Document(Url),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobKind {
    Page,
    Document,
}

/// Raw links of a fetched page, resolved by the coordinator
#[derive(Debug)]
struct PageLinks {
    task: CrawlTask,
    /// URL the page was finally served from, after redirects
    base: Url,
    hrefs: Vec<String>,
}

/// What a worker hands back when its job finishes
#[derive(Debug)]
struct JobReport {
    kind: JobKind,
    outcome: UrlOutcome,
    pdf_text_extracted: bool,
    links: Option<PageLinks>,
}

impl JobReport {
    fn failed(kind: JobKind, outcome: UrlOutcome) -> Self {
        Self {
            kind,
            outcome,
            pdf_text_extracted: false,
            links: None,
        }
    }
}

/// Everything a worker needs, shared between all jobs of a run
struct JobContext {
    client: Client,
    store: Arc<dyn ArtifactStore>,
    extractor: PageExtractor,
    page_timeout: Duration,
    document_timeout: Duration,
    max_document_bytes: u64,
}

/// Main crawler coordinator structure
///
/// The coordinator alone owns the frontier and the visited set. Workers
/// never touch either; they return a [`JobReport`] and the coordinator
/// applies it, so claiming a URL is a plain check-and-insert.
///
/// # Ordering
///
/// With `workers = 1` a page job and every document it links to complete
/// before the next page is popped, so all depth-N pages are fetched before
/// any depth-(N+1) page. With more workers, fetches overlap and BFS layering
/// becomes a soft guarantee: a depth-(N+1) page may start while depth-N
/// pages are still in flight. Deduplication and the depth ceiling hold
/// either way.
pub struct Coordinator {
    config: Arc<Config>,
    config_hash: String,
    context: Arc<JobContext>,
    resolver: LinkResolver,
    visited: VisitedSet,
    frontier: Frontier,
    pending_documents: VecDeque<Url>,
    phase: CrawlPhase,
}

impl Coordinator {
    /// Creates a coordinator writing to the configured output root
    ///
    /// Builds the HTTP client, opens the artifact store and pushes every
    /// seed onto the frontier at depth 0.
    pub fn new(config: Config) -> Result<Self> {
        let store = FsArtifactStore::open(&config.output.root, config.output.collision_policy)?;
        Self::with_store(config, Arc::new(store))
    }

    /// Creates a coordinator persisting through `store`
    pub fn with_store(config: Config, store: Arc<dyn ArtifactStore>) -> Result<Self> {
        let client = build_http_client(&config.user_agent)?;
        let extractor = PageExtractor::from_selectors(&config.crawler.main_content_selectors);

        let context = JobContext {
            client,
            store,
            extractor,
            page_timeout: config.crawler.page_timeout(),
            document_timeout: config.crawler.document_timeout(),
            max_document_bytes: config.crawler.max_document_bytes,
        };

        let visited = VisitedSet::new();
        let mut frontier = Frontier::new();
        for seed in &config.crawler.seeds {
            let url = normalize_url(seed)?;
            if !frontier.push(CrawlTask::new(url, 0), &visited) {
                tracing::debug!("Duplicate seed ignored: {}", seed);
            }
        }
        tracing::info!("Seeded frontier with {} URLs", frontier.len());

        Ok(Self {
            resolver: LinkResolver::new(&config.crawler.domain),
            config: Arc::new(config),
            config_hash: String::new(),
            context: Arc::new(context),
            visited,
            frontier,
            pending_documents: VecDeque::new(),
            phase: CrawlPhase::Idle,
        })
    }

    /// Records the hash of the configuration file in the run summary
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = hash.into();
        self
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Runs the crawl to completion or cancellation
    ///
    /// Consumes the coordinator: a finished run cannot be restarted. Only
    /// start-up problems and invalid phase transitions are returned as
    /// errors; per-URL failures are logged and counted in the summary.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<CrawlSummary> {
        let crawler = &self.config.crawler;
        let max_depth = crawler.max_depth;
        let workers = crawler.workers.max(1) as usize;
        let agent = self.config.user_agent.crawler_name.clone();

        let mut summary = CrawlSummary::new(self.config_hash.clone());
        summary.domain = crawler.domain.clone();
        summary.seeds = crawler.seeds.clone();
        summary.max_depth = max_depth;

        self.phase = self.phase.transition(CrawlPhase::Running)?;
        tracing::info!(
            "Starting crawl of {} (max depth {}, {} worker(s))",
            crawler.domain,
            max_depth,
            workers
        );

        let robots = if crawler.respect_robots_txt && !cancel.is_cancelled() {
            match self.frontier.peek() {
                Some(seed) => {
                    fetch_robots(&self.context.client, &seed.url, self.context.page_timeout).await
                }
                None => ParsedRobots::allow_all(),
            }
        } else {
            ParsedRobots::allow_all()
        };

        let mut delay = crawler.politeness_delay();
        if let Some(robots_delay) = robots
            .crawl_delay(&agent)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        {
            if robots_delay > delay {
                tracing::info!("robots.txt asks for a {:?} crawl delay", robots_delay);
                delay = robots_delay;
            }
        }

        let mut jobs: JoinSet<JobReport> = JoinSet::new();
        let mut cancelled = false;
        let mut pages_dispatched: u64 = 0;
        let mut pages_finished: u64 = 0;
        let start_time = Instant::now();

        loop {
            if !cancelled && cancel.is_cancelled() {
                cancelled = true;
                tracing::info!("Cancellation requested, draining {} job(s)", jobs.len());
            }

            // Fill free worker slots; documents go ahead of pages
            while !cancelled && jobs.len() < workers {
                if let Some(url) = self.pending_documents.pop_front() {
                    jobs.spawn(run_job(Arc::clone(&self.context), Job::Document(url)));
                    continue;
                }

                let Some(task) = self.frontier.pop() else {
                    break;
                };

                if task.depth > max_depth {
                    tracing::debug!("Discarding {} beyond max depth", task.url);
                    summary.record(UrlOutcome::DepthExceeded);
                    continue;
                }

                if !self.visited.insert(&task.url) {
                    continue;
                }

                if !robots.is_allowed(&task.url, &agent) {
                    tracing::info!("URL {} disallowed by robots.txt", task.url);
                    summary.record(UrlOutcome::RobotsDenied);
                    continue;
                }

                if pages_dispatched > 0 && !delay.is_zero() {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            cancelled = true;
                            tracing::info!("Cancellation requested, draining {} job(s)", jobs.len());
                            break;
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }

                pages_dispatched += 1;
                summary.record_depth(task.depth);
                tracing::debug!("Dispatching {} (depth {})", task.url, task.depth);
                jobs.spawn(run_job(Arc::clone(&self.context), Job::Page(task)));
            }

            let idle = self.frontier.is_empty() && self.pending_documents.is_empty();
            if (idle || cancelled) && self.phase == CrawlPhase::Running {
                self.phase = self.phase.transition(CrawlPhase::Draining)?;
            }

            if jobs.is_empty() {
                break;
            }

            let joined = tokio::select! {
                joined = jobs.join_next() => joined,
                _ = cancel.cancelled(), if !cancelled => continue,
            };

            match joined {
                Some(Ok(report)) => {
                    if report.kind == JobKind::Page {
                        pages_finished += 1;
                        if pages_finished % PROGRESS_INTERVAL == 0 {
                            tracing::info!(
                                "Progress: {} pages crawled, {} in frontier, {} unique URLs, {:.1}s elapsed",
                                pages_finished,
                                self.frontier.len(),
                                self.visited.len(),
                                start_time.elapsed().as_secs_f64()
                            );
                        }
                    }
                    self.absorb(report, &mut summary);
                }
                Some(Err(e)) => tracing::error!("Crawl job aborted: {}", e),
                None => {}
            }

            let has_work = !self.frontier.is_empty() || !self.pending_documents.is_empty();
            if has_work && !cancelled && self.phase == CrawlPhase::Draining {
                self.phase = self.phase.transition(CrawlPhase::Running)?;
            }
        }

        self.phase = self.phase.transition(CrawlPhase::Done)?;
        summary.finish(self.visited.len(), cancelled);

        tracing::info!(
            "Crawl {}: {} unique URLs, {} pages saved, {} documents saved, {} PDF texts, {} errors in {:?}",
            summary.status(),
            summary.unique_urls,
            summary.pages_saved(),
            summary.documents_saved(),
            summary.pdf_texts_extracted,
            summary.total_errors(),
            start_time.elapsed()
        );

        if let Some(file_name) = &self.config.output.summary_file {
            if let Err(e) = write_run_report(&summary, &self.config.output.root, file_name) {
                tracing::warn!("Failed to write run report: {}", e);
            }
        }

        Ok(summary)
    }

    /// Applies a finished job to the summary, the visited set and the frontier
    fn absorb(&mut self, report: JobReport, summary: &mut CrawlSummary) {
        summary.record(report.outcome);
        if report.pdf_text_extracted {
            summary.pdf_texts_extracted += 1;
        }

        let Some(links) = report.links else {
            return;
        };

        // A redirect target counts as fetched
        if let Ok(final_url) = normalize_url(links.base.as_str()) {
            self.visited.insert(&final_url);
        }

        let resolved = self.resolver.resolve(
            &links.base,
            links.hrefs.iter().map(String::as_str),
            &self.visited,
        );

        for document in resolved.documents {
            if self.visited.insert(&document) {
                self.pending_documents.push_back(document);
            } else {
                tracing::debug!("Document {} already processed", document);
            }
        }

        if links.task.depth >= self.config.crawler.max_depth {
            if !resolved.crawlable.is_empty() {
                tracing::debug!(
                    "Not expanding {}: max depth {} reached",
                    links.task.url,
                    links.task.depth
                );
            }
            return;
        }

        let mut queued = 0;
        for url in resolved.crawlable {
            if self.frontier.push(links.task.child(url), &self.visited) {
                queued += 1;
            }
        }
        if queued > 0 {
            tracing::debug!("Queued {} links from {}", queued, links.task.url);
        }
    }
}

async fn run_job(context: Arc<JobContext>, job: Job) -> JobReport {
    match job {
        Job::Page(task) => process_page(&context, task).await,
        Job::Document(url) => process_document(&context, url).await,
    }
}

/// Fetches, extracts and persists one page
async fn process_page(context: &JobContext, task: CrawlTask) -> JobReport {
    let page = match fetch_page(&context.client, &task.url, context.page_timeout).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", task.url, e);
            return JobReport::failed(JobKind::Page, UrlOutcome::from_fetch_error(&e));
        }
    };

    let (extracted, hrefs) = context.extractor.extract_with_links(&task.url, &page.body);

    let outcome = match context.store.save_page(&task.url, &extracted) {
        Ok(path) => {
            tracing::info!(
                "Saved page {} (depth {}) to {}",
                task.url,
                task.depth,
                path.display()
            );
            UrlOutcome::PageSaved
        }
        Err(e) => {
            tracing::error!("Failed to save page {}: {}", task.url, e);
            UrlOutcome::StorageFailed
        }
    };

    JobReport {
        kind: JobKind::Page,
        outcome,
        pdf_text_extracted: false,
        links: Some(PageLinks {
            task,
            base: page.final_url,
            hrefs,
        }),
    }
}

/// Downloads one document, extracts PDF text and persists both
async fn process_document(context: &JobContext, url: Url) -> JobReport {
    let bytes = match fetch_binary(
        &context.client,
        &url,
        context.document_timeout,
        context.max_document_bytes,
    )
    .await
    {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to download document {}: {}", url, e);
            return JobReport::failed(JobKind::Document, UrlOutcome::from_fetch_error(&e));
        }
    };

    let bytes: Arc<[u8]> = bytes.into();
    let text = if is_pdf(&url) {
        let input = Arc::clone(&bytes);
        match tokio::task::spawn_blocking(move || extract_pdf_text(&input)).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("PDF extraction task for {} failed: {}", url, e);
                Some(String::new())
            }
        }
    } else {
        None
    };

    let pdf_text_extracted = text.as_deref().is_some_and(|t| !t.trim().is_empty());

    match context.store.save_document(&url, &bytes, text.as_deref()) {
        Ok(path) => {
            tracing::info!("Saved document {} to {}", url, path.display());
            JobReport {
                kind: JobKind::Document,
                outcome: UrlOutcome::DocumentSaved,
                pdf_text_extracted,
                links: None,
            }
        }
        Err(e) => {
            tracing::error!("Failed to save document {}: {}", url, e);
            JobReport::failed(JobKind::Document, UrlOutcome::StorageFailed)
        }
    }
}
