// Run metrics
//
// Counters are atomics so they can be shared by reference with observers without
// interior locking. The summary is logged once when the process exits.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Counters for one process run
#[derive(Debug)]
pub struct Metrics {
    /// Barcode files written (combined documents count each placed item)
    pub barcodes_generated: AtomicUsize,

    /// Items that failed to encode, render or save
    pub barcodes_failed: AtomicUsize,

    /// Batches started
    pub batches_run: AtomicUsize,

    /// Wall time spent in generation, in milliseconds
    pub total_generation_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            barcodes_generated: AtomicUsize::new(0),
            barcodes_failed: AtomicUsize::new(0),
            batches_run: AtomicUsize::new(0),
            total_generation_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_generated(&self) {
        self.barcodes_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.barcodes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch(&self) {
        self.batches_run.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generation_time(&self, duration: Duration) {
        self.total_generation_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average generation time per successful barcode in milliseconds
    pub fn avg_generation_time_ms(&self) -> f64 {
        let total = self.total_generation_time_ms.load(Ordering::Relaxed);
        let count = self.barcodes_generated.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Run Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Barcodes: {} generated, {} failed, {} batches",
            self.barcodes_generated.load(Ordering::Relaxed),
            self.barcodes_failed.load(Ordering::Relaxed),
            self.batches_run.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Generation time: {:.2}s (avg: {:.2}ms per barcode)",
            self.total_generation_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            self.avg_generation_time_ms()
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
