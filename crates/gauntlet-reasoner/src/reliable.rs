use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::warn;

use gauntlet_core::errors::ReasonerError;
use gauntlet_core::reasoner::Reasoner;
use gauntlet_core::request::RoundRequest;
use gauntlet_telemetry::ReasonerMetrics;

/// Retry policy for transient (rate-limit) failures.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Backoff before retry n is `base_delay * n` (linear, not exponential).
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(60),
        }
    }
}

/// Wraps a Reasoner with bounded retry on rate-limit failures.
///
/// - Only transient errors are retried; anything else propagates immediately
/// - Honors a server-suggested `retry_after` over the computed backoff
/// - Exhausted retries escalate to RetriesExhausted, never a silent default
/// - Sleeps inline: callers must treat `complete` as long-running
pub struct ReliableReasoner<R: Reasoner> {
    inner: R,
    config: RetryConfig,
    metrics: Arc<ReasonerMetrics>,
}

impl<R: Reasoner> ReliableReasoner<R> {
    pub fn new(inner: R, config: RetryConfig) -> Self {
        Self {
            inner,
            config,
            metrics: Arc::new(ReasonerMetrics::new()),
        }
    }

    pub fn with_defaults(inner: R) -> Self {
        Self::new(inner, RetryConfig::default())
    }

    /// Shared handle to the call counters, for the health endpoint.
    pub fn metrics(&self) -> Arc<ReasonerMetrics> {
        Arc::clone(&self.metrics)
    }

    fn retry_delay(&self, attempt: u32, suggested: Option<Duration>) -> Duration {
        suggested.unwrap_or(self.config.base_delay * attempt)
    }
}

#[async_trait]
impl<R: Reasoner> Reasoner for ReliableReasoner<R> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn complete(&self, request: &RoundRequest) -> Result<String, ReasonerError> {
        for attempt in 1..=self.config.max_attempts {
            let started = Instant::now();
            match self.inner.complete(request).await {
                Ok(text) => {
                    self.metrics.record_call(started.elapsed(), true);
                    return Ok(text);
                }
                Err(e) => {
                    self.metrics.record_call(started.elapsed(), false);

                    if !e.is_transient() {
                        return Err(e);
                    }
                    self.metrics.record_rate_limit();

                    if attempt == self.config.max_attempts {
                        return Err(ReasonerError::RetriesExhausted {
                            attempts: attempt,
                            last: e.to_string(),
                        });
                    }

                    let delay = self.retry_delay(attempt, e.suggested_delay());
                    warn!(
                        attempt,
                        max_attempts = self.config.max_attempts,
                        delay_secs = delay.as_secs(),
                        kind = request.kind(),
                        "rate limited, retrying after backoff"
                    );
                    self.metrics.record_retry();
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(ReasonerError::RetriesExhausted {
            attempts: 0,
            last: "no attempts configured".into(),
        })
    }
}
