/// Work item state definitions for tracking crawl progress
///
/// Every `(url, depth)` pair pulled from the work queue walks this state
/// machine exactly once.
use crate::CrawlError;
use std::fmt;

/// Represents the current state of a work item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkState {
    // ===== Active States =====
    /// Item is waiting on the work queue
    Queued,

    /// Item's URL was claimed in the visited store by this worker
    Claimed,

    /// Page is currently being fetched
    Fetching,

    // ===== Terminal States =====
    /// Page was fetched and its counts recorded; no links followed
    Analyzed,

    /// Page was analyzed and its links were handed to the queue
    Expanded,

    /// Fetch failed; the claim stays in place with a zero result
    Failed,

    /// URL had already been claimed by another item
    Duplicate,

    /// Claimed beyond the maximum depth; never fetched
    DepthExceeded,

    /// Run was cancelled while the item was in flight
    Cancelled,
}

impl WorkState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if this is an active state (item may still be processed)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Queued | Self::Claimed | Self::Fetching)
    }

    /// Returns true if the page body was analyzed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Analyzed | Self::Expanded)
    }

    /// Returns true if the transition `self -> next` is allowed
    pub fn can_transition_to(&self, next: WorkState) -> bool {
        use WorkState::*;
        matches!(
            (self, next),
            (Queued, Claimed)
                | (Queued, Duplicate)
                | (Queued, Cancelled)
                | (Claimed, Fetching)
                | (Claimed, DepthExceeded)
                | (Claimed, Cancelled)
                | (Fetching, Analyzed)
                | (Fetching, Failed)
                | (Fetching, Cancelled)
                | (Analyzed, Expanded)
        )
    }

    /// Moves to `next`, rejecting transitions the state machine does not allow
    pub fn transition(&mut self, next: WorkState) -> Result<(), CrawlError> {
        if !self.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Claimed => "claimed",
            Self::Fetching => "fetching",
            Self::Analyzed => "analyzed",
            Self::Expanded => "expanded",
            Self::Failed => "failed",
            Self::Duplicate => "duplicate",
            Self::DepthExceeded => "depth_exceeded",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for WorkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
