mod metrics;

pub use metrics::{LatencySummary, MetricsSnapshot, ReasonerMetrics};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. RUST_LOG overrides the default
/// filter. Safe to call once per process; later calls are ignored.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.to_owned()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
