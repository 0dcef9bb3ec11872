use std::time::Duration;

/// Typed error hierarchy for reasoning-service calls. Only rate-limit /
/// quota signals are transient; everything else fails the call outright.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ReasonerError {
    // Transient — retried with backoff
    #[error("rate limited")]
    RateLimited { retry_after: Option<Duration> },

    // Fatal — propagated immediately
    #[error("server error {status}: {body}")]
    ServerError { status: u16, body: String },
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    // Escalation of exhausted transient retries
    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

impl ReasonerError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    pub fn suggested_delay(&self) -> Option<Duration> {
        if let Self::RateLimited { retry_after } = self {
            *retry_after
        } else {
            None
        }
    }

    /// Short classification string for logging and transport mapping.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "rate_limited",
            Self::ServerError { .. } => "server_error",
            Self::NetworkError(_) => "network_error",
            Self::InvalidRequest(_) => "invalid_request",
            Self::AuthenticationFailed(_) => "authentication_failed",
            Self::InvalidResponse(_) => "invalid_response",
            Self::RetriesExhausted { .. } => "retries_exhausted",
        }
    }

    /// Whether the error should be reported to callers as a rate-limit
    /// condition (including the escalated exhausted-retries form).
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::RetriesExhausted { .. })
    }

    /// Classify an HTTP error response. A 429 status or a quota/rate keyword
    /// in the body marks the failure as transient.
    pub fn from_status(status: u16, body: String) -> Self {
        if status == 429 || looks_rate_limited(&body) {
            return Self::RateLimited { retry_after: None };
        }
        match status {
            401 | 403 => Self::AuthenticationFailed(body),
            400 => Self::InvalidRequest(body),
            500..=599 => Self::ServerError { status, body },
            _ => Self::InvalidRequest(format!("unexpected status {status}: {body}")),
        }
    }
}

/// Keyword heuristic for providers that bury quota errors in non-429
/// responses.
fn looks_rate_limited(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    lower.contains("quota") || lower.contains("rate")
}
