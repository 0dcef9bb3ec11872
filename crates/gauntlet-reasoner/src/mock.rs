use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use gauntlet_core::errors::ReasonerError;
use gauntlet_core::reasoner::Reasoner;
use gauntlet_core::request::RoundRequest;

/// A scripted reply for deterministic testing without API calls.
pub enum MockReply {
    Text(String),
    Error(ReasonerError),
}

impl MockReply {
    pub fn text(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// Mock reasoner that replays scripted replies in sequence and records every
/// request it receives, so tests can assert on exactly what each round was
/// allowed to see.
pub struct MockReasoner {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<RoundRequest>>,
}

impl MockReasoner {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<RoundRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<RoundRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl Reasoner for MockReasoner {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: &RoundRequest) -> Result<String, ReasonerError> {
        self.requests.lock().push(request.clone());

        let reply = self.replies.lock().pop_front();
        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error(e)) => Err(e),
            None => Err(ReasonerError::InvalidRequest(format!(
                "MockReasoner: no reply configured for call {}",
                self.call_count()
            ))),
        }
    }
}
