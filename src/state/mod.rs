//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the lifecycle of one crawl run (idle, running, draining, done)
//! - `UrlOutcome`: what happened to each URL the run touched

mod outcome;
mod phase;

// Re-export main types
pub use outcome::UrlOutcome;
pub use phase::CrawlPhase;
