//! Prometheus metrics for the ante pipeline.
//!
//! All metrics follow the naming convention: `ante_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., fee rejections)
//! - **Histogram**: Distribution of values (e.g., assigned priorities)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, HistogramVec,
    Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // CHAIN METRICS
    // =========================================================================

    /// Transactions run through a decorator chain
    pub static ref ANTE_TXS: CounterVec = CounterVec::new(
        Opts::new("ante_chain_txs_total", "Transactions processed by an ante chain"),
        &["chain", "outcome"]  // chain: minimal/full, outcome: accepted/rejected
    ).expect("metric creation failed");

    /// Rejections by error kind
    pub static ref ANTE_REJECTIONS: CounterVec = CounterVec::new(
        Opts::new("ante_chain_rejections_total", "Rejected transactions by error kind"),
        &["kind"]
    ).expect("metric creation failed");

    /// Time spent running a chain
    pub static ref ANTE_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "ante_chain_duration_seconds",
            "Time spent running an ante chain"
        ).buckets(exponential_buckets(0.00001, 2.0, 15).unwrap()),
        &["chain"]
    ).expect("metric creation failed");

    // =========================================================================
    // FEE METRICS
    // =========================================================================

    /// Fee evaluations that failed every configured floor
    pub static ref FEE_REJECTIONS: Counter = Counter::new(
        "ante_fee_rejections_total",
        "Transactions rejected for insufficient fees"
    ).expect("metric creation failed");

    /// Transactions admitted through the free-message exemption
    pub static ref FEE_EXEMPTIONS: Counter = Counter::new(
        "ante_fee_exemptions_total",
        "Transactions admitted without fee checks"
    ).expect("metric creation failed");

    /// Priorities assigned during check
    pub static ref TX_PRIORITY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "ante_fee_tx_priority",
            "Priority assigned to checked transactions"
        ).buckets(exponential_buckets(1.0, 4.0, 16).unwrap())
    ).expect("metric creation failed");

    // =========================================================================
    // SHARED COUNTER METRICS
    // =========================================================================

    /// Gas added to the per-block total
    pub static ref BLOCK_GAS_ACCUMULATED: Counter = Counter::new(
        "ante_block_gas_accumulated_total",
        "Gas limits added to the block gas total"
    ).expect("metric creation failed");

    /// Account-number ranges reserved by non-committing executions
    pub static ref ACCOUNT_NUMBER_RESERVATIONS: CounterVec = CounterVec::new(
        Opts::new(
            "ante_account_number_reservations_total",
            "Account-number offsets applied by mode"
        ),
        &["mode"]
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Chains
        Box::new(ANTE_TXS.clone()),
        Box::new(ANTE_REJECTIONS.clone()),
        Box::new(ANTE_DURATION.clone()),
        // Fees
        Box::new(FEE_REJECTIONS.clone()),
        Box::new(FEE_EXEMPTIONS.clone()),
        Box::new(TX_PRIORITY.clone()),
        // Shared counters
        Box::new(BLOCK_GAS_ACCUMULATED.clone()),
        Box::new(ACCOUNT_NUMBER_RESERVATIONS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
