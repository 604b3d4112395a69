// ProgressBridge - renders batch events on the terminal
//
// The batch generator reports through BatchObserver after every item; this adapter turns
// those events into an indicatif progress bar and keeps the run metrics in step.

use crate::metrics::Metrics;
use crate::state::{BatchEvent, BatchObserver, ItemStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str = "[{prefix}] {elapsed_precise} {bar:36.cyan/blue} {pos:>4}/{len:4} {msg}";

/// Batch observer backed by an indicatif [`ProgressBar`]
///
/// indicatif draws to stderr and stays silent when stderr is not a terminal.
pub struct ProgressBridge<'a> {
    bar: ProgressBar,
    metrics: &'a Metrics,
}

impl<'a> ProgressBridge<'a> {
    pub fn new(metrics: &'a Metrics) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_prefix("batch");
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("■■□"),
        );
        Self::with_bar(bar, metrics)
    }

    /// Wrap an existing bar, e.g. [`ProgressBar::hidden`]
    pub fn with_bar(bar: ProgressBar, metrics: &'a Metrics) -> Self {
        Self { bar, metrics }
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

impl BatchObserver for ProgressBridge<'_> {
    fn on_event(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Started { total } => {
                self.metrics.record_batch();
                self.bar.set_length(*total as u64);
                self.bar.set_position(0);
                self.bar.enable_steady_tick(Duration::from_millis(100));
            }
            BatchEvent::ItemProcessed {
                index,
                total,
                text,
                status,
            } => {
                match status {
                    ItemStatus::Generated => self.metrics.record_generated(),
                    ItemStatus::Failed(reason) => {
                        self.metrics.record_failed();
                        self.bar.println(format!("  failed: {} ({})", text, reason));
                    }
                }
                self.bar.set_position(*index as u64);
                self.bar.set_message(format!("Processing: {}/{}", index, total));
            }
            BatchEvent::Finished { succeeded, failed } => {
                self.bar.finish_with_message(format!(
                    "Completed: {} successful, {} failed",
                    succeeded, failed
                ));
            }
        }
    }
}
