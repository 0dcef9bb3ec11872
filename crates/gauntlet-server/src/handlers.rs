use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use gauntlet_engine::{EngineError, FinalOutcome, RoundOutcome, StatusReport};

use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub resume: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

/// Maps engine errors onto HTTP. Caller mistakes are 400s, exhausted
/// rate-limit retries are 429s so clients can distinguish them from generic
/// server failures.
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let e = self.0;
        let status = if e.is_client_error() {
            StatusCode::BAD_REQUEST
        } else if e.is_rate_limit() {
            StatusCode::TOO_MANY_REQUESTS
        } else {
            error!(kind = e.error_kind(), error = %e, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let mut body = json!({
            "detail": e.to_string(),
            "error_kind": e.error_kind(),
        });
        if e.is_rate_limit() {
            body["error_type"] = json!("rate_limit");
        }

        (status, Json(body)).into_response()
    }
}

pub async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "service": "gauntlet",
        "status": "running",
        "endpoints": [
            "POST /start",
            "POST /round/2/answer",
            "POST /round/3/answer",
            "GET  /final-decision",
            "GET  /status",
            "GET  /health",
        ],
    }))
}

pub async fn start(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Result<Json<RoundOutcome>, ApiError> {
    let outcome = state
        .orchestrator
        .start(&req.resume, req.role.as_deref())
        .await?;
    Ok(Json(outcome))
}

pub async fn submit_answer(
    State(state): State<AppState>,
    Path(round): Path<u8>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<RoundOutcome>, ApiError> {
    let outcome = state.orchestrator.submit_answer(round, &req.answer).await?;
    Ok(Json(outcome))
}

pub async fn final_decision(
    State(state): State<AppState>,
) -> Result<Json<FinalOutcome>, ApiError> {
    let outcome = state.orchestrator.final_decision().await?;
    Ok(Json(outcome))
}

pub async fn status(State(state): State<AppState>) -> Result<Json<StatusReport>, ApiError> {
    let report = state.orchestrator.status().await?;
    Ok(Json(report))
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "reasoner": state.orchestrator.reasoner_name(),
        "model": state.orchestrator.reasoner_model(),
        "metrics": state.metrics.snapshot(),
    }))
}
