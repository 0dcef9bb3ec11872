use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

/// In-process counters for reasoning-service traffic. Shared between the
/// retry wrapper and the health endpoint.
#[derive(Default)]
pub struct ReasonerMetrics {
    calls: AtomicU64,
    failures: AtomicU64,
    retries: AtomicU64,
    rate_limit_hits: AtomicU64,
    latency_ms: Mutex<Vec<f64>>,
}

/// Percentile summary of observed call latencies.
#[derive(Clone, Debug, Default, Serialize)]
pub struct LatencySummary {
    pub count: usize,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub max_ms: f64,
}

/// Point-in-time view of all counters, serialized into /health.
#[derive(Clone, Debug, Serialize)]
pub struct MetricsSnapshot {
    pub calls: u64,
    pub failures: u64,
    pub retries: u64,
    pub rate_limit_hits: u64,
    pub latency: LatencySummary,
}

impl ReasonerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_call(&self, latency: Duration, ok: bool) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        self.latency_ms.lock().push(latency.as_secs_f64() * 1000.0);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rate_limit(&self) {
        self.rate_limit_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            calls: self.calls.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            rate_limit_hits: self.rate_limit_hits.load(Ordering::Relaxed),
            latency: self.latency_summary(),
        }
    }

    fn latency_summary(&self) -> LatencySummary {
        let mut obs = self.latency_ms.lock();
        if obs.is_empty() {
            return LatencySummary::default();
        }
        obs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let count = obs.len();
        LatencySummary {
            count,
            p50_ms: obs[count / 2],
            p95_ms: obs[((count as f64 * 0.95) as usize).min(count - 1)],
            max_ms: obs[count - 1],
        }
    }
}
