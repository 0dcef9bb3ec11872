use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use gauntlet_core::reasoner::Reasoner;
use gauntlet_core::rounds::{Decision, InterviewStatus, Round};
use gauntlet_store::VerdictRepo;

use crate::context;
use crate::decision::parse_decision;
use crate::error::EngineError;
use crate::session::Session;

pub const DEFAULT_ROLE: &str = "Software Engineer";

/// Result of a verdict-producing round transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoundOutcome {
    pub round: u8,
    pub decision: Decision,
    pub verdict: String,
    pub status: InterviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_round: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Committee outcome. Memoized per session: computed at most once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FinalOutcome {
    pub decision: Decision,
    pub rationale: String,
    pub status: InterviewStatus,
}

#[derive(Clone, Debug, Serialize)]
pub struct VerdictPresence {
    pub round1: bool,
    pub round2: bool,
    pub round3: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct StatusReport {
    pub round: u8,
    pub status: InterviewStatus,
    pub has_resume: bool,
    pub verdicts: VerdictPresence,
}

/// The round state machine. Owns the single active session, assembles each
/// round's bounded context, delegates judgment to the reasoner, persists
/// verdicts, and gates progression on the parsed decision.
///
/// All operations serialize behind one async mutex: there is never more than
/// one in-flight transition, so round evaluation order is strict.
pub struct Orchestrator {
    session: Mutex<Session>,
    verdicts: VerdictRepo,
    reasoner: Arc<dyn Reasoner>,
}

impl Orchestrator {
    pub fn new(reasoner: Arc<dyn Reasoner>, verdicts: VerdictRepo) -> Self {
        Self {
            session: Mutex::new(Session::new()),
            verdicts,
            reasoner,
        }
    }

    /// Start a new interview: reset everything, run screening, and on a
    /// non-FAIL decision generate the technical questions for round 2.
    #[instrument(skip(self, resume, role))]
    pub async fn start(
        &self,
        resume: &str,
        role: Option<&str>,
    ) -> Result<RoundOutcome, EngineError> {
        let resume = resume.trim();
        if resume.is_empty() {
            return Err(EngineError::Validation("Resume cannot be empty.".into()));
        }

        let mut session = self.session.lock().await;
        self.verdicts.reset()?;
        *session = Session::new();
        session.begin(
            resume.to_owned(),
            role.map(str::trim)
                .filter(|r| !r.is_empty())
                .unwrap_or(DEFAULT_ROLE)
                .to_owned(),
        );
        info!(session_id = %session.id, role = %session.role, "interview started");

        let request = context::screening(&session);
        let verdict = self.reasoner.complete(&request).await?;
        let decision = parse_decision(&verdict);
        self.verdicts.write(Round::Screening, decision, &verdict)?;

        if decision.is_fail() {
            session.reject();
            info!(session_id = %session.id, "candidate rejected at screening");
            return Ok(RoundOutcome {
                round: 1,
                decision,
                verdict,
                status: session.status,
                next_round: None,
                next_question: None,
                message: Some("The candidate did not pass the screening round.".into()),
            });
        }

        let question_request = context::technical_questions(&session, &self.verdicts)?;
        let question = self.reasoner.complete(&question_request).await?;
        session.set_question(Round::Technical, question.clone());
        session.advance_to(Round::Technical);

        Ok(RoundOutcome {
            round: 1,
            decision,
            verdict,
            status: session.status,
            next_round: Some(2),
            next_question: Some(question),
            message: None,
        })
    }

    /// Submit the candidate's answer for round 2 or 3. Valid only while the
    /// interview is ongoing and the session is at exactly that round.
    #[instrument(skip(self, answer), fields(round = round_number))]
    pub async fn submit_answer(
        &self,
        round_number: u8,
        answer: &str,
    ) -> Result<RoundOutcome, EngineError> {
        let mut session = self.session.lock().await;

        if session.status != InterviewStatus::Ongoing {
            return Err(EngineError::InvalidState(format!(
                "Interview is {}.",
                session.status
            )));
        }

        let round = match Round::from_number(round_number) {
            Some(r @ (Round::Technical | Round::Scenario)) => r,
            _ => {
                return Err(EngineError::InvalidState(format!(
                    "Round {round_number} does not accept answers."
                )))
            }
        };

        if session.round != round {
            return Err(EngineError::InvalidState(format!(
                "Expected round {}, currently at round {}.",
                round.number(),
                session.round.number()
            )));
        }

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(EngineError::Validation("Answer cannot be empty.".into()));
        }

        session.record_answer(round, answer);

        match round {
            Round::Technical => self.evaluate_technical(&mut session, answer).await,
            Round::Scenario => self.evaluate_scenario(&mut session, answer).await,
            _ => unreachable!("only answer rounds reach evaluation"),
        }
    }

    async fn evaluate_technical(
        &self,
        session: &mut Session,
        answer: &str,
    ) -> Result<RoundOutcome, EngineError> {
        let request = context::technical_evaluation(session, &self.verdicts, answer)?;
        let verdict = self.reasoner.complete(&request).await?;
        let decision = parse_decision(&verdict);
        self.verdicts.write(Round::Technical, decision, &verdict)?;

        if decision.is_fail() {
            session.reject();
            info!(session_id = %session.id, "candidate rejected at technical round");
            return Ok(RoundOutcome {
                round: 2,
                decision,
                verdict,
                status: session.status,
                next_round: None,
                next_question: None,
                message: Some("The candidate did not pass the technical round.".into()),
            });
        }

        let question_request = context::scenario_question(session, &self.verdicts)?;
        let question = self.reasoner.complete(&question_request).await?;
        session.set_question(Round::Scenario, question.clone());
        session.advance_to(Round::Scenario);

        Ok(RoundOutcome {
            round: 2,
            decision,
            verdict,
            status: session.status,
            next_round: Some(3),
            next_question: Some(question),
            message: None,
        })
    }

    async fn evaluate_scenario(
        &self,
        session: &mut Session,
        answer: &str,
    ) -> Result<RoundOutcome, EngineError> {
        let request = context::scenario_evaluation(session, &self.verdicts, answer)?;
        let verdict = self.reasoner.complete(&request).await?;
        let decision = parse_decision(&verdict);
        self.verdicts.write(Round::Scenario, decision, &verdict)?;

        if decision.is_fail() {
            session.reject();
            info!(session_id = %session.id, "candidate rejected at scenario round");
            return Ok(RoundOutcome {
                round: 3,
                decision,
                verdict,
                status: session.status,
                next_round: None,
                next_question: None,
                message: Some("The candidate did not pass the scenario round.".into()),
            });
        }

        session.complete();
        info!(session_id = %session.id, "all rounds complete");

        Ok(RoundOutcome {
            round: 3,
            decision,
            verdict,
            status: session.status,
            next_round: None,
            next_question: None,
            message: Some("All rounds complete. The committee decision is available at /final-decision.".into()),
        })
    }

    /// Compute (or replay) the committee decision. A rejected session yields
    /// a synthesized REJECT without a reasoning call; a completed session
    /// invokes the committee at most once and memoizes the result.
    #[instrument(skip(self))]
    pub async fn final_decision(&self) -> Result<FinalOutcome, EngineError> {
        let mut session = self.session.lock().await;

        match session.status {
            InterviewStatus::Rejected => Ok(FinalOutcome {
                decision: Decision::Reject,
                rationale: "Candidate was rejected in an earlier round.".into(),
                status: InterviewStatus::Rejected,
            }),
            InterviewStatus::Ongoing => Err(EngineError::InvalidState(
                "Interview is not complete. All rounds must be finished first.".into(),
            )),
            InterviewStatus::Complete => {
                if let Some(cached) = &session.final_decision {
                    return Ok(cached.clone());
                }

                let request = context::committee(&self.verdicts)?;
                let rationale = self.reasoner.complete(&request).await?;
                let decision = parse_decision(&rationale);

                let outcome = FinalOutcome {
                    decision,
                    rationale,
                    status: InterviewStatus::Complete,
                };
                session.final_decision = Some(outcome.clone());
                info!(session_id = %session.id, decision = %decision, "committee decision recorded");
                Ok(outcome)
            }
        }
    }

    /// Current progress snapshot for polling clients.
    pub async fn status(&self) -> Result<StatusReport, EngineError> {
        let session = self.session.lock().await;
        let [round1, round2, round3] = self.verdicts.presence()?;

        Ok(StatusReport {
            round: session.round.number(),
            status: session.status,
            has_resume: session.has_resume(),
            verdicts: VerdictPresence { round1, round2, round3 },
        })
    }

    /// Discard the session and all persisted verdicts. A structurally new
    /// session begins at round 1.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<(), EngineError> {
        let mut session = self.session.lock().await;
        self.verdicts.reset()?;
        *session = Session::new();
        info!(session_id = %session.id, "session reset");
        Ok(())
    }

    pub fn reasoner_name(&self) -> &str {
        self.reasoner.name()
    }

    pub fn reasoner_model(&self) -> &str {
        self.reasoner.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_core::errors::ReasonerError;
    use gauntlet_core::request::RoundRequest;
    use gauntlet_reasoner::{MockReasoner, MockReply};
    use gauntlet_store::Database;

    const RESUME: &str = "RESUME-MARKER: 5 years backend, Go, Postgres";
    const TECH_ANSWER: &str = "ANSWER-MARKER-2: I'd use an LRU cache with TTL";
    const SCENARIO_ANSWER: &str = "ANSWER-MARKER-3: page the on-call, roll back, write a postmortem";

    fn setup(replies: Vec<MockReply>) -> (Arc<MockReasoner>, Orchestrator) {
        let mock = Arc::new(MockReasoner::new(replies));
        let verdicts = VerdictRepo::new(Database::in_memory().unwrap());
        let orchestrator = Orchestrator::new(mock.clone(), verdicts);
        (mock, orchestrator)
    }

    fn happy_path_replies(scenario_decision: &str, committee_decision: &str) -> Vec<MockReply> {
        vec![
            MockReply::text("Decision: PASS\nScore: 8 / 10\nStrong screening signal."),
            MockReply::text("TECHNICAL INTERVIEW QUESTIONS\n1. Design a cache layer."),
            MockReply::text("Decision: PASS\nScore: 7 / 10\nSolid technical answers."),
            MockReply::text("SCENARIO QUESTION\nYour primary database is down at peak traffic."),
            MockReply::text(&format!("Decision: {scenario_decision}\nScore: 6 / 10\nReasonable judgment.")),
            MockReply::text(&format!("FINAL HIRING DECISION\n\nDecision: {committee_decision}\n\nConsistent signal.")),
        ]
    }

    #[tokio::test]
    async fn full_pipeline_happy_path() {
        let (mock, orchestrator) = setup(happy_path_replies("BORDERLINE", "HIRE"));

        let r1 = orchestrator.start(RESUME, None).await.unwrap();
        assert_eq!(r1.round, 1);
        assert_eq!(r1.decision, Decision::Pass);
        assert_eq!(r1.status, InterviewStatus::Ongoing);
        assert_eq!(r1.next_round, Some(2));
        assert!(r1.next_question.unwrap().contains("cache layer"));

        let r2 = orchestrator.submit_answer(2, TECH_ANSWER).await.unwrap();
        assert_eq!(r2.decision, Decision::Pass);
        assert_eq!(r2.next_round, Some(3));
        assert!(r2.next_question.unwrap().contains("database is down"));

        let r3 = orchestrator.submit_answer(3, SCENARIO_ANSWER).await.unwrap();
        assert_eq!(r3.decision, Decision::Borderline);
        assert_eq!(r3.status, InterviewStatus::Complete);
        assert!(r3.next_round.is_none());

        let final_outcome = orchestrator.final_decision().await.unwrap();
        assert_eq!(final_outcome.decision, Decision::Hire);
        assert_eq!(final_outcome.status, InterviewStatus::Complete);

        assert_eq!(mock.call_count(), 6);
    }

    #[tokio::test]
    async fn blank_resume_rejected_before_any_call() {
        let (mock, orchestrator) = setup(vec![]);

        let err = orchestrator.start("   ", None).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(mock.call_count(), 0);

        // No session mutation occurred
        let status = orchestrator.status().await.unwrap();
        assert_eq!(status.round, 1);
        assert_eq!(status.status, InterviewStatus::Ongoing);
        assert!(!status.has_resume);
        assert!(!status.verdicts.round1);
    }

    #[tokio::test]
    async fn screening_fail_terminates() {
        let (mock, orchestrator) = setup(vec![MockReply::text(
            "Decision: FAIL\nScore: 2 / 10\nNo relevant experience.",
        )]);

        let outcome = orchestrator.start(RESUME, None).await.unwrap();
        assert_eq!(outcome.decision, Decision::Fail);
        assert_eq!(outcome.status, InterviewStatus::Rejected);
        assert!(outcome.message.unwrap().contains("screening"));
        // No question-generation call after a FAIL
        assert_eq!(mock.call_count(), 1);

        // No further transitions accepted
        let err = orchestrator.submit_answer(2, "anything").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));

        // Final decision synthesized without a reasoning call
        let final_outcome = orchestrator.final_decision().await.unwrap();
        assert_eq!(final_outcome.decision, Decision::Reject);
        assert_eq!(final_outcome.status, InterviewStatus::Rejected);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn technical_fail_terminates() {
        let (mock, orchestrator) = setup(vec![
            MockReply::text("Decision: PASS\nGood resume."),
            MockReply::text("1. Question one."),
            MockReply::text("Decision: FAIL\nIncorrect answers."),
        ]);

        orchestrator.start(RESUME, None).await.unwrap();
        let outcome = orchestrator.submit_answer(2, TECH_ANSWER).await.unwrap();
        assert_eq!(outcome.status, InterviewStatus::Rejected);
        assert!(outcome.message.unwrap().contains("technical"));
        assert_eq!(mock.call_count(), 3);

        let err = orchestrator.submit_answer(3, "anything").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));
    }

    #[tokio::test]
    async fn scenario_fail_terminates() {
        let (mock, orchestrator) = setup(vec![
            MockReply::text("Decision: PASS\nGood resume."),
            MockReply::text("1. Question one."),
            MockReply::text("Decision: PASS\nGood answers."),
            MockReply::text("SCENARIO QUESTION\nAn outage at 3am."),
            MockReply::text("Decision: FAIL\nPanicked under pressure."),
        ]);

        orchestrator.start(RESUME, None).await.unwrap();
        orchestrator.submit_answer(2, TECH_ANSWER).await.unwrap();
        let outcome = orchestrator.submit_answer(3, SCENARIO_ANSWER).await.unwrap();
        assert_eq!(outcome.decision, Decision::Fail);
        assert_eq!(outcome.status, InterviewStatus::Rejected);
        assert!(outcome.message.unwrap().contains("scenario"));

        // Final decision synthesized without a committee call
        let final_outcome = orchestrator.final_decision().await.unwrap();
        assert_eq!(final_outcome.decision, Decision::Reject);
        assert_eq!(mock.call_count(), 5);
    }

    #[tokio::test]
    async fn borderline_advances_like_pass() {
        let (_, orchestrator) = setup(vec![
            MockReply::text("Decision: BORDERLINE\nThin but plausible resume."),
            MockReply::text("1. Question one."),
        ]);

        let outcome = orchestrator.start(RESUME, None).await.unwrap();
        assert_eq!(outcome.decision, Decision::Borderline);
        assert_eq!(outcome.status, InterviewStatus::Ongoing);
        assert_eq!(outcome.next_round, Some(2));
    }

    #[tokio::test]
    async fn wrong_round_submission_rejected() {
        let (_, orchestrator) = setup(happy_path_replies("PASS", "HIRE"));
        orchestrator.start(RESUME, None).await.unwrap();

        let err = orchestrator.submit_answer(3, "answer").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));

        let err = orchestrator.submit_answer(1, "answer").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));
    }

    #[tokio::test]
    async fn blank_answer_rejected_without_call() {
        let (mock, orchestrator) = setup(happy_path_replies("PASS", "HIRE"));
        orchestrator.start(RESUME, None).await.unwrap();
        let calls_before = mock.call_count();

        let err = orchestrator.submit_answer(2, "  \n ").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(mock.call_count(), calls_before);
    }

    #[tokio::test]
    async fn final_decision_memoized() {
        let (mock, orchestrator) = setup(happy_path_replies("PASS", "HOLD"));
        orchestrator.start(RESUME, None).await.unwrap();
        orchestrator.submit_answer(2, TECH_ANSWER).await.unwrap();
        orchestrator.submit_answer(3, SCENARIO_ANSWER).await.unwrap();

        let first = orchestrator.final_decision().await.unwrap();
        let calls_after_first = mock.call_count();

        let second = orchestrator.final_decision().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(mock.call_count(), calls_after_first);
    }

    #[tokio::test]
    async fn final_decision_requires_completion() {
        let (_, orchestrator) = setup(happy_path_replies("PASS", "HIRE"));
        orchestrator.start(RESUME, None).await.unwrap();

        let err = orchestrator.final_decision().await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));
    }

    #[tokio::test]
    async fn committee_never_sees_resume_or_answers() {
        let (mock, orchestrator) = setup(happy_path_replies("BORDERLINE", "HOLD"));
        orchestrator.start(RESUME, None).await.unwrap();
        orchestrator.submit_answer(2, TECH_ANSWER).await.unwrap();
        orchestrator.submit_answer(3, SCENARIO_ANSWER).await.unwrap();
        orchestrator.final_decision().await.unwrap();

        let committee_request = mock.last_request().unwrap();
        assert!(matches!(committee_request, RoundRequest::Committee(_)));

        let prompt = committee_request.render();
        assert!(!prompt.contains("RESUME-MARKER"));
        assert!(!prompt.contains("ANSWER-MARKER-2"));
        assert!(!prompt.contains("ANSWER-MARKER-3"));
        // It does carry the three verdict texts
        assert!(prompt.contains("Strong screening signal."));
        assert!(prompt.contains("Solid technical answers."));
        assert!(prompt.contains("Reasonable judgment."));
    }

    #[tokio::test]
    async fn status_tracks_progress() {
        let (_, orchestrator) = setup(happy_path_replies("PASS", "HIRE"));

        let s = orchestrator.status().await.unwrap();
        assert_eq!(s.round, 1);
        assert!(!s.has_resume);

        orchestrator.start(RESUME, None).await.unwrap();
        let s = orchestrator.status().await.unwrap();
        assert_eq!(s.round, 2);
        assert!(s.has_resume);
        assert!(s.verdicts.round1);
        assert!(!s.verdicts.round2);

        orchestrator.submit_answer(2, TECH_ANSWER).await.unwrap();
        orchestrator.submit_answer(3, SCENARIO_ANSWER).await.unwrap();
        let s = orchestrator.status().await.unwrap();
        assert_eq!(s.round, 4);
        assert_eq!(s.status, InterviewStatus::Complete);
        assert!(s.verdicts.round3);
    }

    #[tokio::test]
    async fn reset_restores_fresh_state() {
        let (_, orchestrator) = setup(happy_path_replies("PASS", "HIRE"));
        orchestrator.start(RESUME, None).await.unwrap();
        orchestrator.submit_answer(2, TECH_ANSWER).await.unwrap();

        orchestrator.reset().await.unwrap();

        let s = orchestrator.status().await.unwrap();
        assert_eq!(s.round, 1);
        assert_eq!(s.status, InterviewStatus::Ongoing);
        assert!(!s.has_resume);
        assert_eq!(
            (s.verdicts.round1, s.verdicts.round2, s.verdicts.round3),
            (false, false, false)
        );
    }

    #[tokio::test]
    async fn start_discards_previous_session() {
        let (_, orchestrator) = setup(vec![
            MockReply::text("Decision: FAIL\nWeak resume."),
            MockReply::text("Decision: PASS\nBetter resume."),
            MockReply::text("1. Question one."),
        ]);

        let first = orchestrator.start("weak resume", None).await.unwrap();
        assert_eq!(first.status, InterviewStatus::Rejected);

        let second = orchestrator.start("better resume", None).await.unwrap();
        assert_eq!(second.status, InterviewStatus::Ongoing);

        let s = orchestrator.status().await.unwrap();
        assert_eq!(s.round, 2);
        assert!(s.verdicts.round1);
        assert!(!s.verdicts.round2);
    }

    #[tokio::test]
    async fn custom_role_reaches_screening_prompt() {
        let (mock, orchestrator) = setup(vec![MockReply::text("Decision: FAIL\nNot a fit.")]);
        orchestrator.start(RESUME, Some("Staff SRE")).await.unwrap();

        let prompt = mock.last_request().unwrap().render();
        assert!(prompt.contains("Staff SRE"));
    }

    #[tokio::test]
    async fn default_role_applied_when_omitted() {
        let (mock, orchestrator) = setup(vec![MockReply::text("Decision: FAIL\nNot a fit.")]);
        orchestrator.start(RESUME, Some("  ")).await.unwrap();

        let prompt = mock.last_request().unwrap().render();
        assert!(prompt.contains(DEFAULT_ROLE));
    }

    #[tokio::test]
    async fn reasoner_failure_propagates_unchanged() {
        let (_, orchestrator) = setup(vec![MockReply::Error(ReasonerError::RetriesExhausted {
            attempts: 3,
            last: "rate limited".into(),
        })]);

        let err = orchestrator.start(RESUME, None).await.unwrap_err();
        assert!(err.is_rate_limit());
        assert_eq!(err.error_kind(), "retries_exhausted");

        // Session stays at round 1 with the resume bound; no verdict written
        let s = orchestrator.status().await.unwrap();
        assert_eq!(s.round, 1);
        assert_eq!(s.status, InterviewStatus::Ongoing);
        assert!(s.has_resume);
        assert!(!s.verdicts.round1);
    }
}
