//! Completion detection for a crawl with no known item count
//!
//! Every processed work item reports exactly one [`Completion`] carrying the
//! number of new items it produced. A single collector folds those messages
//! into two counters: `produced` starts at 1 for the seed and grows by each
//! fan-out, `completed` grows by one per message. Once they are equal no item
//! is queued or in flight, so nothing can ever be produced again.
//!
//! Workers send their completion before enqueuing the children it counts. The
//! channel is FIFO, so a child's completion can never be folded in ahead of its
//! parent's fan-out.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

/// One finished work item and the number of items it enqueued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub fan_out: usize,
}

/// The produced/completed counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionTracker {
    produced: usize,
    completed: usize,
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionTracker {
    /// A tracker that has seen the seed item produced
    pub fn new() -> Self {
        Self {
            produced: 1,
            completed: 0,
        }
    }

    /// Folds one completion in and returns true once the crawl is finished
    pub fn record(&mut self, completion: Completion) -> bool {
        self.completed += 1;
        self.produced += completion.fan_out;
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.completed == self.produced
    }

    pub fn produced(&self) -> usize {
        self.produced
    }

    pub fn completed(&self) -> usize {
        self.completed
    }
}

/// Worker-side handle for reporting completions
#[derive(Debug, Clone)]
pub struct CompletionSender {
    tx: UnboundedSender<Completion>,
}

impl CompletionSender {
    /// Reports one finished item with its fan-out
    pub fn complete(&self, fan_out: usize) {
        if self.tx.send(Completion { fan_out }).is_err() {
            // Collector already stopped (cancelled run); nothing left to count
            tracing::trace!("Completion dropped after collector shutdown");
        }
    }
}

/// Final state of the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionSummary {
    pub produced: usize,
    pub completed: usize,
    pub cancelled: bool,
}

/// Collector side of the completion channel
#[derive(Debug)]
pub struct CompletionDetector {
    rx: UnboundedReceiver<Completion>,
    tracker: CompletionTracker,
}

/// Creates a connected sender/detector pair
pub fn channel() -> (CompletionSender, CompletionDetector) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        CompletionSender { tx },
        CompletionDetector {
            rx,
            tracker: CompletionTracker::new(),
        },
    )
}

impl CompletionDetector {
    /// Waits until every produced item has completed
    ///
    /// Stops early if `cancel` fires or every sender is dropped before the
    /// counters meet; both cases are reported as cancelled.
    pub async fn wait(mut self, cancel: &CancellationToken) -> CompletionSummary {
        let mut cancelled = false;

        while !self.tracker.is_done() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                message = self.rx.recv() => match message {
                    Some(completion) => {
                        self.tracker.record(completion);
                    }
                    None => {
                        tracing::warn!(
                            "All workers exited with {} of {} items completed",
                            self.tracker.completed(),
                            self.tracker.produced()
                        );
                        cancelled = true;
                        break;
                    }
                },
            }
        }

        CompletionSummary {
            produced: self.tracker.produced(),
            completed: self.tracker.completed(),
            cancelled,
        }
    }
}
