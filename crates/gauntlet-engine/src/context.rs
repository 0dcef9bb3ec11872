//! Builds the bounded input for each reasoning call. Every builder assembles
//! exactly the fields its round is allowed to see; the committee builder
//! takes only the verdict store, so resume and answer text cannot reach it.

use gauntlet_core::request::{
    CommitteeRequest, RoundRequest, ScenarioEvaluationRequest, ScenarioQuestionRequest,
    ScreeningRequest, TechnicalEvaluationRequest, TechnicalQuestionsRequest,
};
use gauntlet_core::rounds::Round;
use gauntlet_store::VerdictRepo;

use crate::error::EngineError;
use crate::session::Session;

pub fn screening(session: &Session) -> RoundRequest {
    RoundRequest::Screening(ScreeningRequest {
        resume: session.resume.clone(),
        role: session.role.clone(),
    })
}

pub fn technical_questions(
    session: &Session,
    verdicts: &VerdictRepo,
) -> Result<RoundRequest, EngineError> {
    Ok(RoundRequest::TechnicalQuestions(TechnicalQuestionsRequest {
        resume: session.resume.clone(),
        screening_verdict: verdicts.read_text(Round::Screening)?,
    }))
}

pub fn technical_evaluation(
    session: &Session,
    verdicts: &VerdictRepo,
    answer: &str,
) -> Result<RoundRequest, EngineError> {
    let questions = session.question(Round::Technical).ok_or_else(|| {
        EngineError::InvalidState("no technical questions recorded for this session".into())
    })?;

    Ok(RoundRequest::TechnicalEvaluation(TechnicalEvaluationRequest {
        resume: session.resume.clone(),
        screening_verdict: verdicts.read_text(Round::Screening)?,
        questions: questions.to_owned(),
        answer: answer.to_owned(),
    }))
}

pub fn scenario_question(
    session: &Session,
    verdicts: &VerdictRepo,
) -> Result<RoundRequest, EngineError> {
    Ok(RoundRequest::ScenarioQuestion(ScenarioQuestionRequest {
        resume: session.resume.clone(),
        screening_verdict: verdicts.read_text(Round::Screening)?,
        technical_verdict: verdicts.read_text(Round::Technical)?,
    }))
}

pub fn scenario_evaluation(
    session: &Session,
    verdicts: &VerdictRepo,
    answer: &str,
) -> Result<RoundRequest, EngineError> {
    let question = session.question(Round::Scenario).ok_or_else(|| {
        EngineError::InvalidState("no scenario question recorded for this session".into())
    })?;

    Ok(RoundRequest::ScenarioEvaluation(ScenarioEvaluationRequest {
        resume: session.resume.clone(),
        screening_verdict: verdicts.read_text(Round::Screening)?,
        technical_verdict: verdicts.read_text(Round::Technical)?,
        question: question.to_owned(),
        answer: answer.to_owned(),
    }))
}

/// The committee input is built from the verdict store alone — no session
/// parameter exists, so no path can leak resume or answer text into it.
pub fn committee(verdicts: &VerdictRepo) -> Result<RoundRequest, EngineError> {
    Ok(RoundRequest::Committee(CommitteeRequest {
        screening_verdict: verdicts.read_text(Round::Screening)?,
        technical_verdict: verdicts.read_text(Round::Technical)?,
        scenario_verdict: verdicts.read_text(Round::Scenario)?,
    }))
}
