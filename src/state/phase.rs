//! Crawl run lifecycle

use crate::HarvestError;
use std::fmt;

/// Phase of a crawl run
///
/// ```text
/// Idle -> Running <-> Draining -> Done
/// ```
///
/// `Draining` means the frontier is empty but jobs are still in flight; a
/// job that discovers new pages sends the run back to `Running`. `Done` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    Idle,
    Running,
    Draining,
    Done,
}

impl CrawlPhase {
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Draining)
                | (Self::Draining, Self::Running)
                | (Self::Draining, Self::Done)
        )
    }

    /// Moves to `next`, rejecting transitions the lifecycle does not allow
    pub fn transition(self, next: CrawlPhase) -> Result<CrawlPhase, HarvestError> {
        if self.can_transition_to(next) {
            tracing::debug!("Crawl phase {} -> {}", self, next);
            Ok(next)
        } else {
            Err(HarvestError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
