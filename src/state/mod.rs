// Batch progress tracking
//
// A batch moves through Idle -> Running -> Completed. The batch generator reports every
// transition and every processed item to a BatchObserver, which lets the presentation
// layer pick its own refresh cadence.

use crate::models::BatchResult;

/// Lifecycle of a batch run. There is no pause or cancellation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BatchPhase {
    #[default]
    Idle,
    Running,
    Completed,
}

/// Outcome of a single batch item
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemStatus {
    Generated,
    Failed(String),
}

/// Events emitted while a batch runs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchEvent {
    /// Batch has started
    Started { total: usize },

    /// An item has been processed, successfully or not
    ItemProcessed {
        /// 1-based position of the item
        index: usize,
        total: usize,
        text: String,
        status: ItemStatus,
    },

    /// Batch has finished
    Finished { succeeded: usize, failed: usize },
}

/// Receives [`BatchEvent`]s from the batch generator
pub trait BatchObserver {
    fn on_event(&mut self, event: &BatchEvent);
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {
    fn on_event(&mut self, _event: &BatchEvent) {}
}

impl<F> BatchObserver for F
where
    F: FnMut(&BatchEvent),
{
    fn on_event(&mut self, event: &BatchEvent) {
        self(event)
    }
}

/// Progress counters for one batch run, with transition checking
///
/// The batch generator owns one of these and forwards every change to the observer.
#[derive(Debug, Default)]
pub struct BatchProgress {
    phase: BatchPhase,
    total: usize,
    processed: usize,
}

impl BatchProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Move from Idle to Running
    pub fn start(&mut self, total: usize, observer: &mut dyn BatchObserver) {
        debug_assert_eq!(self.phase, BatchPhase::Idle, "batch already started");
        self.phase = BatchPhase::Running;
        self.total = total;
        tracing::info!("Batch started with {} items", total);
        observer.on_event(&BatchEvent::Started { total });
    }

    /// Record one processed item and advance the counter
    pub fn item_done(&mut self, text: &str, status: ItemStatus, observer: &mut dyn BatchObserver) {
        debug_assert_eq!(self.phase, BatchPhase::Running, "batch not running");
        self.processed += 1;
        if let ItemStatus::Failed(reason) = &status {
            tracing::warn!("Item {} ({}) failed: {}", self.processed, text, reason);
        }
        observer.on_event(&BatchEvent::ItemProcessed {
            index: self.processed,
            total: self.total,
            text: text.to_string(),
            status,
        });
    }

    /// Move from Running to Completed, reporting the final result
    pub fn finish(&mut self, result: &BatchResult, observer: &mut dyn BatchObserver) {
        debug_assert_eq!(self.phase, BatchPhase::Running, "batch not running");
        self.phase = BatchPhase::Completed;
        tracing::info!(
            "Batch completed: {} succeeded, {} failed",
            result.success_count,
            result.failed_items.len()
        );
        observer.on_event(&BatchEvent::Finished {
            succeeded: result.success_count,
            failed: result.failed_items.len(),
        });
    }
}
