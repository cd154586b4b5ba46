//! Internal metrics collection.
//!
//! Counters describe what the process did to datasets (generated, loaded,
//! enriched). They never hold dataset contents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A gauge metric (last value wins).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, 10s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let idx = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len() - 1);
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns (upper bound ms, count) pairs.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for dataset lifecycle and analytics.
#[derive(Debug, Default)]
pub struct Metrics {
    // Generation
    pub events_generated: Counter,
    pub datasets_generated: Counter,

    // Persistence
    pub datasets_loaded: Counter,
    pub events_loaded: Counter,
    pub events_enriched: Counter,
    pub dataset_load_failures: Counter,
    pub dataset_write_failures: Counter,

    // Analytics
    pub rollups_computed: Counter,
    pub empty_filter_results: Counter,

    // Latency histograms
    pub load_latency_ms: Histogram,
    pub generate_latency_ms: Histogram,

    // Gauges
    pub dataset_rows: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            events_generated: self.events_generated.get(),
            datasets_generated: self.datasets_generated.get(),
            datasets_loaded: self.datasets_loaded.get(),
            events_loaded: self.events_loaded.get(),
            events_enriched: self.events_enriched.get(),
            dataset_load_failures: self.dataset_load_failures.get(),
            dataset_write_failures: self.dataset_write_failures.get(),
            rollups_computed: self.rollups_computed.get(),
            empty_filter_results: self.empty_filter_results.get(),
            load_latency_mean_ms: self.load_latency_ms.mean(),
            generate_latency_mean_ms: self.generate_latency_ms.mean(),
            dataset_rows: self.dataset_rows.get(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub events_generated: u64,
    pub datasets_generated: u64,
    pub datasets_loaded: u64,
    pub events_loaded: u64,
    pub events_enriched: u64,
    pub dataset_load_failures: u64,
    pub dataset_write_failures: u64,
    pub rollups_computed: u64,
    pub empty_filter_results: u64,
    pub load_latency_mean_ms: f64,
    pub generate_latency_mean_ms: f64,
    pub dataset_rows: u64,
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
