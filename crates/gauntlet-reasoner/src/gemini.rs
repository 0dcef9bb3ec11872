use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use gauntlet_core::errors::ReasonerError;
use gauntlet_core::ids::RequestId;
use gauntlet_core::reasoner::Reasoner;
use gauntlet_core::request::RoundRequest;
use gauntlet_core::security::ApiKey;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Non-streaming Gemini client. One prompt in, one text reply out; the
/// structured decision line is recovered downstream by the parser.
pub struct GeminiReasoner {
    client: Client,
    api_key: ApiKey,
    model: String,
}

impl GeminiReasoner {
    pub fn new(api_key: ApiKey, model: Option<&str>) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            api_key,
            model: model.unwrap_or(DEFAULT_MODEL).to_owned(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/models/{}:generateContent", self.model)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn build_body(prompt: String) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user".into(),
            parts: vec![Part { text: prompt }],
        }],
    }
}

/// Join the text parts of the first candidate. An empty reply is an error —
/// the orchestrator needs verdict text to persist.
fn extract_text(response: GenerateContentResponse) -> Result<String, ReasonerError> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ReasonerError::InvalidResponse(
            "no candidate text in response".into(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl Reasoner for GeminiReasoner {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(model = %self.model, kind = request.kind(), request_id = %RequestId::new()))]
    async fn complete(&self, request: &RoundRequest) -> Result<String, ReasonerError> {
        let body = build_body(request.render());

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.0.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ReasonerError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ReasonerError::from_status(status, body));
        }

        let parsed: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| ReasonerError::InvalidResponse(e.to_string()))?;

        extract_text(parsed)
    }
}
