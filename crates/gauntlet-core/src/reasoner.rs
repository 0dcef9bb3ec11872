use async_trait::async_trait;

use crate::errors::ReasonerError;
use crate::request::RoundRequest;

/// Text-in/text-out interface to the external reasoning service. The core
/// never interprets the reply beyond decision extraction; implementations
/// decide transport, model, and retry behavior.
#[async_trait]
pub trait Reasoner: Send + Sync {
    fn name(&self) -> &str;
    fn model(&self) -> &str;

    /// Execute one reasoning call. May block the task for a long time
    /// (network latency plus any internal backoff).
    async fn complete(&self, request: &RoundRequest) -> Result<String, ReasonerError>;
}
