use std::collections::BTreeMap;

use gauntlet_core::ids::SessionId;
use gauntlet_core::rounds::{InterviewStatus, Round};

use crate::orchestrator::FinalOutcome;

/// Mutable in-process record of the active interview. Exactly one exists at
/// a time; a reset replaces it wholesale with a fresh instance.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: SessionId,
    pub round: Round,
    pub status: InterviewStatus,
    pub resume: String,
    pub role: String,
    answers: BTreeMap<u8, Vec<String>>,
    questions: BTreeMap<u8, String>,
    pub final_decision: Option<FinalOutcome>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            round: Round::Screening,
            status: InterviewStatus::Ongoing,
            resume: String::new(),
            role: String::new(),
            answers: BTreeMap::new(),
            questions: BTreeMap::new(),
            final_decision: None,
        }
    }

    /// Bind the candidate inputs at session start. The resume is immutable
    /// afterwards.
    pub fn begin(&mut self, resume: String, role: String) {
        self.resume = resume;
        self.role = role;
    }

    pub fn has_resume(&self) -> bool {
        !self.resume.is_empty()
    }

    /// Append a submitted answer. Answers are never removed or rewritten.
    pub fn record_answer(&mut self, round: Round, answer: &str) {
        self.answers
            .entry(round.number())
            .or_default()
            .push(answer.to_owned());
    }

    pub fn answers(&self, round: Round) -> &[String] {
        self.answers
            .get(&round.number())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Record a generated question. Written once; a second write for the
    /// same round is ignored.
    pub fn set_question(&mut self, round: Round, question: String) {
        self.questions.entry(round.number()).or_insert(question);
    }

    pub fn question(&self, round: Round) -> Option<&str> {
        self.questions.get(&round.number()).map(String::as_str)
    }

    /// Move forward to the given round. Never moves backwards.
    pub fn advance_to(&mut self, round: Round) {
        self.round = self.round.max(round);
    }

    pub fn reject(&mut self) {
        self.status = InterviewStatus::Rejected;
    }

    pub fn complete(&mut self) {
        self.status = InterviewStatus::Complete;
        self.advance_to(Round::Committee);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
