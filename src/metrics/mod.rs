//! Prometheus metrics for codefold
//!
//! Counters for indexing, degraded files and engine calls, plus search
//! request counts and latency.

use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // Indexing metrics
    // ============================================================================

    /// Files turned into outlines
    pub static ref FILES_INDEXED: Counter = Counter::with_opts(
        Opts::new(
            "codefold_files_indexed_total",
            "Total number of files indexed"
        )
    ).expect("Failed to create FILES_INDEXED counter");

    /// Files indexed without symbols because of a missing grammar or engine failure
    pub static ref DEGRADED_FILES: Counter = Counter::with_opts(
        Opts::new(
            "codefold_degraded_files_total",
            "Total number of files indexed in degraded mode"
        )
    ).expect("Failed to create DEGRADED_FILES counter");

    /// Query engine batch invocations
    pub static ref ENGINE_INVOCATIONS: Counter = Counter::with_opts(
        Opts::new(
            "codefold_engine_invocations_total",
            "Total number of query engine invocations"
        )
    ).expect("Failed to create ENGINE_INVOCATIONS counter");

    // ============================================================================
    // Search metrics
    // ============================================================================

    /// Total number of search requests
    pub static ref SEARCH_REQUESTS: Counter = Counter::with_opts(
        Opts::new(
            "codefold_search_requests_total",
            "Total number of search requests"
        )
    ).expect("Failed to create SEARCH_REQUESTS counter");

    /// Search request latency in seconds
    pub static ref SEARCH_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "codefold_search_latency_seconds",
            "Search request latency in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0])
    ).expect("Failed to create SEARCH_LATENCY histogram");
}

static REGISTER: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Safe to call more than once; only the first call registers.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        let collectors: [Box<dyn prometheus::core::Collector>; 5] = [
            Box::new(FILES_INDEXED.clone()),
            Box::new(DEGRADED_FILES.clone()),
            Box::new(ENGINE_INVOCATIONS.clone()),
            Box::new(SEARCH_REQUESTS.clone()),
            Box::new(SEARCH_LATENCY.clone()),
        ];
        for collector in collectors {
            if let Err(e) = REGISTRY.register(collector) {
                tracing::error!("Failed to register metric: {}", e);
            }
        }
    });
}

/// Gather all metrics and encode them in Prometheus text format
///
/// Returns an empty string if encoding fails.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Metrics contained invalid UTF-8: {}", e);
        String::new()
    })
}

/// Current metric values, for the `stats` command.
pub struct MetricSnapshot {
    pub files_indexed: f64,
    pub degraded_files: f64,
    pub engine_invocations: f64,
    pub search_requests_total: f64,
    pub search_latency_avg: f64,
}

impl MetricSnapshot {
    /// Capture the current state of all metrics
    pub fn capture() -> Self {
        Self {
            files_indexed: FILES_INDEXED.get(),
            degraded_files: DEGRADED_FILES.get(),
            engine_invocations: ENGINE_INVOCATIONS.get(),
            search_requests_total: SEARCH_REQUESTS.get(),
            search_latency_avg: calculate_histogram_avg(&SEARCH_LATENCY),
        }
    }
}

fn calculate_histogram_avg(histogram: &Histogram) -> f64 {
    let count = histogram.get_sample_count();
    if count == 0 {
        return 0.0;
    }
    histogram.get_sample_sum() / count as f64
}
