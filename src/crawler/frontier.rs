//! Frontier and visited-set for one crawl run
//!
//! Both structures are owned by a single coordinator, which makes every
//! check-and-insert atomic with respect to the crawl loop without locks.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be fetched, with its distance from the seeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// The normalized URL to fetch
    pub url: Url,

    /// Number of links followed from a seed (seeds are 0)
    pub depth: u32,
}

impl CrawlTask {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }

    /// A task one level deeper than this one
    pub fn child(&self, url: Url) -> Self {
        Self {
            url,
            depth: self.depth + 1,
        }
    }
}

/// Normalized URLs already claimed by this run
///
/// Grows monotonically. A URL present here is never fetched or queued again.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a URL; returns `true` only for the first claim
    pub fn insert(&mut self, url: &Url) -> bool {
        self.urls.insert(url.as_str().to_string())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// FIFO queue of crawl tasks with deduplication
///
/// Tasks are appended at the tail and depth only grows along a path, so
/// popping from the head yields every depth-N task before any depth-(N+1)
/// task.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<CrawlTask>,
    queued: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task unless its URL was visited or is already waiting
    ///
    /// # Returns
    ///
    /// `true` if the task was appended
    pub fn push(&mut self, task: CrawlTask, visited: &VisitedSet) -> bool {
        if visited.contains(&task.url) {
            return false;
        }
        if !self.queued.insert(task.url.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(task);
        true
    }

    /// Removes the oldest task; `None` means the frontier is exhausted
    pub fn pop(&mut self) -> Option<CrawlTask> {
        let task = self.queue.pop_front()?;
        self.queued.remove(task.url.as_str());
        Some(task)
    }

    /// The task `pop` would return next
    pub fn peek(&self) -> Option<&CrawlTask> {
        self.queue.front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
