//! Worker pool sizing and resampling metrics

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Number of workers for `drivers` tasks: `min(cores, drivers, max_workers)`, at least 1
pub fn worker_count(drivers: usize, max_workers: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    cores
        .min(drivers)
        .min(max_workers.unwrap_or(usize::MAX))
        .max(1)
}

/// Resampling metrics
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Drivers resampled successfully
    pub drivers_resampled: AtomicU64,

    /// Drivers excluded for missing telemetry
    pub drivers_excluded: AtomicU64,

    /// Samples discarded on timestamp collisions
    pub duplicates_dropped: AtomicU64,

    /// Worker count of the last run
    pub workers: AtomicUsize,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resampled driver
    pub fn record_resampled(&self) {
        self.drivers_resampled.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an excluded driver
    pub fn record_excluded(&self) {
        self.drivers_excluded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record discarded duplicate samples
    pub fn record_duplicates(&self, count: usize) {
        self.duplicates_dropped
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Update worker count
    pub fn update_workers(&self, workers: usize) {
        self.workers.store(workers, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            drivers_resampled: self.drivers_resampled.load(Ordering::Relaxed),
            drivers_excluded: self.drivers_excluded.load(Ordering::Relaxed),
            duplicates_dropped: self.duplicates_dropped.load(Ordering::Relaxed),
            workers: self.workers.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Drivers resampled successfully
    pub drivers_resampled: u64,

    /// Drivers excluded for missing telemetry
    pub drivers_excluded: u64,

    /// Samples discarded on timestamp collisions
    pub duplicates_dropped: u64,

    /// Worker count of the last run
    pub workers: usize,
}
