//! Work queue shared by the worker pool
//!
//! This module handles:
//! - The unbounded FIFO of `(url, depth)` items every worker pulls from
//! - The per-worker pause taken before each item
//!
//! Both suspension points give way to cancellation.

use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// A URL waiting to be processed at a given depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Canonical URL
    pub url: String,

    /// Link distance from the seed
    pub depth: u32,
}

impl WorkItem {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }

    /// The item a discovered link becomes
    pub fn child(&self, url: impl Into<String>) -> Self {
        Self::new(url, self.depth.saturating_add(1))
    }
}

/// Multi-producer, multi-consumer FIFO of work items
///
/// Pushing never blocks, so a worker can hand its discovered links straight to
/// the queue. Pulling is serialized through a mutex around the receiver.
#[derive(Debug)]
pub struct WorkQueue {
    sender: UnboundedSender<WorkItem>,
    receiver: Mutex<UnboundedReceiver<WorkItem>>,
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// Adds an item to the back of the queue
    pub fn push(&self, item: WorkItem) {
        // The receiver lives as long as the queue, so this cannot fail
        let _ = self.sender.send(item);
    }

    /// Waits for the next item
    ///
    /// Returns `None` once `cancel` fires; a cancelled token wins over a ready
    /// item.
    pub async fn next(&self, cancel: &CancellationToken) -> Option<WorkItem> {
        if cancel.is_cancelled() {
            return None;
        }

        let mut receiver = tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            guard = self.receiver.lock() => guard,
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            item = receiver.recv() => item,
        }
    }
}

/// Sleeps for the inter-request delay
///
/// Returns false if the wait was cut short by cancellation.
pub async fn pace(delay: Duration, cancel: &CancellationToken) -> bool {
    if delay.is_zero() {
        return !cancel.is_cancelled();
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
