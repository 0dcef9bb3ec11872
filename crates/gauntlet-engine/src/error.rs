use gauntlet_core::errors::ReasonerError;
use gauntlet_store::StoreError;

/// Errors surfaced by orchestrator operations. Validation and state errors
/// are raised before any reasoning-service call is made; reasoner failures
/// arrive here only after the client's own retry budget is spent.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidState(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reasoner(#[from] ReasonerError),
}

impl EngineError {
    /// Short classification string for transport-layer mapping.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InvalidState(_) => "invalid_state",
            Self::Store(StoreError::NotFound(_)) => "not_found",
            Self::Store(_) => "store",
            Self::Reasoner(e) => e.error_kind(),
        }
    }

    /// Whether the failure should be reported as a rate-limit condition.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::Reasoner(e) if e.is_rate_limit())
    }

    /// Caller-correctable errors (bad input or out-of-sequence call).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidState(_))
    }
}
