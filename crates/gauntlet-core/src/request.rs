use crate::rounds::Round;

/// Round-1 input: the resume and the target role label, nothing else.
#[derive(Clone, Debug)]
pub struct ScreeningRequest {
    pub resume: String,
    pub role: String,
}

/// Round-2 question generation: resume plus the screening verdict.
#[derive(Clone, Debug)]
pub struct TechnicalQuestionsRequest {
    pub resume: String,
    pub screening_verdict: String,
}

/// Round-2 evaluation: adds the asked questions and the candidate's answer.
#[derive(Clone, Debug)]
pub struct TechnicalEvaluationRequest {
    pub resume: String,
    pub screening_verdict: String,
    pub questions: String,
    pub answer: String,
}

/// Round-3 question generation: resume plus both prior verdicts.
#[derive(Clone, Debug)]
pub struct ScenarioQuestionRequest {
    pub resume: String,
    pub screening_verdict: String,
    pub technical_verdict: String,
}

/// Round-3 evaluation.
#[derive(Clone, Debug)]
pub struct ScenarioEvaluationRequest {
    pub resume: String,
    pub screening_verdict: String,
    pub technical_verdict: String,
    pub question: String,
    pub answer: String,
}

/// Committee input. This type deliberately has no field capable of holding
/// the resume or a raw answer: the final decision must be reproducible from
/// the three verdict texts alone.
#[derive(Clone, Debug)]
pub struct CommitteeRequest {
    pub screening_verdict: String,
    pub technical_verdict: String,
    pub scenario_verdict: String,
}

/// One reasoning-service invocation. Each variant carries exactly the inputs
/// its round is allowed to see.
#[derive(Clone, Debug)]
pub enum RoundRequest {
    Screening(ScreeningRequest),
    TechnicalQuestions(TechnicalQuestionsRequest),
    TechnicalEvaluation(TechnicalEvaluationRequest),
    ScenarioQuestion(ScenarioQuestionRequest),
    ScenarioEvaluation(ScenarioEvaluationRequest),
    Committee(CommitteeRequest),
}

impl RoundRequest {
    pub fn round(&self) -> Round {
        match self {
            Self::Screening(_) => Round::Screening,
            Self::TechnicalQuestions(_) | Self::TechnicalEvaluation(_) => Round::Technical,
            Self::ScenarioQuestion(_) | Self::ScenarioEvaluation(_) => Round::Scenario,
            Self::Committee(_) => Round::Committee,
        }
    }

    /// Short label for logging and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Screening(_) => "screening",
            Self::TechnicalQuestions(_) => "technical_questions",
            Self::TechnicalEvaluation(_) => "technical_evaluation",
            Self::ScenarioQuestion(_) => "scenario_question",
            Self::ScenarioEvaluation(_) => "scenario_evaluation",
            Self::Committee(_) => "committee",
        }
    }

    /// Whether the reply is expected to carry a `Decision:` line. Question
    /// generation replies are free text and are never decision-parsed.
    pub fn expects_decision(&self) -> bool {
        !matches!(self, Self::TechnicalQuestions(_) | Self::ScenarioQuestion(_))
    }

    /// Render the full prompt: the whitelisted inputs for this round plus the
    /// required output-format instruction.
    pub fn render(&self) -> String {
        match self {
            Self::Screening(r) => format!(
                "You are screening a candidate's resume for the {role} role.\n\n\
                 ## TARGET ROLE\n{role}\n\n\
                 ## CANDIDATE RESUME\n{resume}\n\n\
                 ## YOUR TASK\n\
                 Assess role fit, relevant skills, and experience level. Identify \
                 strengths and weaknesses relative to the {role} position, then decide \
                 whether the candidate advances.\n\n\
                 ## REQUIRED OUTPUT FORMAT (follow exactly)\n\
                 ROUND 1 — SCREENING (Role: {role})\n\n\
                 Decision: [PASS|BORDERLINE|FAIL]\n\
                 Score: [X] / 10\n\n\
                 Strengths: [key strengths]\n\
                 Weaknesses: [key weaknesses]\n\n\
                 Reasoning: [detailed explanation of fit]",
                role = r.role,
                resume = r.resume,
            ),
            Self::TechnicalQuestions(r) => format!(
                "You are preparing a technical interview.\n\n\
                 ## CANDIDATE RESUME\n{resume}\n\n\
                 ## SCREENING VERDICT (Round 1)\n{verdict}\n\n\
                 ## YOUR TASK\n\
                 Generate exactly 2-3 targeted technical questions that probe the \
                 candidate's claimed skills and the weaknesses noted in the screening.\n\n\
                 ## REQUIRED OUTPUT FORMAT\n\
                 TECHNICAL INTERVIEW QUESTIONS\n\n\
                 1. [question]\n\
                 2. [question]\n\
                 3. [question]",
                resume = r.resume,
                verdict = r.screening_verdict,
            ),
            Self::TechnicalEvaluation(r) => format!(
                "You are evaluating a candidate's technical interview answers.\n\n\
                 ## CANDIDATE RESUME\n{resume}\n\n\
                 ## SCREENING VERDICT (Round 1)\n{verdict}\n\n\
                 ## TECHNICAL QUESTIONS ASKED\n{questions}\n\n\
                 ## CANDIDATE'S ANSWERS\n{answer}\n\n\
                 ## YOUR TASK\n\
                 Evaluate each answer for correctness, depth, and clarity, then decide.\n\n\
                 ## REQUIRED OUTPUT FORMAT (follow exactly)\n\
                 ROUND 2 — TECHNICAL\n\n\
                 Decision: [PASS|FAIL]\n\
                 Score: [X] / 10\n\n\
                 Strengths: [key strengths]\n\
                 Weaknesses: [key weaknesses]\n\n\
                 Reasoning: [detailed evaluation of answers]",
                resume = r.resume,
                verdict = r.screening_verdict,
                questions = r.questions,
                answer = r.answer,
            ),
            Self::ScenarioQuestion(r) => format!(
                "You are designing a scenario-based interview question.\n\n\
                 ## CANDIDATE RESUME\n{resume}\n\n\
                 ## SCREENING VERDICT (Round 1)\n{r1}\n\n\
                 ## TECHNICAL VERDICT (Round 2)\n{r2}\n\n\
                 ## YOUR TASK\n\
                 Create ONE realistic production scenario or behavioral question, \
                 specific to the candidate's skill set and level, that tests \
                 decision-making, trade-off analysis, and practical judgment.\n\n\
                 ## REQUIRED OUTPUT FORMAT\n\
                 SCENARIO QUESTION\n\n\
                 [your detailed scenario here]",
                resume = r.resume,
                r1 = r.screening_verdict,
                r2 = r.technical_verdict,
            ),
            Self::ScenarioEvaluation(r) => format!(
                "You are evaluating a candidate's scenario interview response.\n\n\
                 ## CANDIDATE RESUME\n{resume}\n\n\
                 ## SCREENING VERDICT (Round 1)\n{r1}\n\n\
                 ## TECHNICAL VERDICT (Round 2)\n{r2}\n\n\
                 ## SCENARIO QUESTION ASKED\n{question}\n\n\
                 ## CANDIDATE'S RESPONSE\n{answer}\n\n\
                 ## YOUR TASK\n\
                 Evaluate decision-making quality, trade-off awareness, communication, \
                 and practical judgment, then decide.\n\n\
                 ## REQUIRED OUTPUT FORMAT (follow exactly)\n\
                 ROUND 3 — SCENARIO\n\n\
                 Decision: [PASS|BORDERLINE|FAIL]\n\
                 Score: [X] / 10\n\n\
                 Strengths: [key strengths]\n\
                 Weaknesses: [key weaknesses]\n\n\
                 Reasoning: [detailed evaluation]",
                resume = r.resume,
                r1 = r.screening_verdict,
                r2 = r.technical_verdict,
                question = r.question,
                answer = r.answer,
            ),
            Self::Committee(r) => format!(
                "You chair the hiring committee and must make the final decision.\n\n\
                 ## IMPORTANT\n\
                 Base your decision ONLY on the round verdicts below. You do not have \
                 access to the candidate's resume or raw answers.\n\n\
                 ## ROUND 1 — SCREENING VERDICT\n{r1}\n\n\
                 ## ROUND 2 — TECHNICAL VERDICT\n{r2}\n\n\
                 ## ROUND 3 — SCENARIO VERDICT\n{r3}\n\n\
                 ## YOUR TASK\n\
                 Synthesize the three verdicts, weigh the overall signal, and decide.\n\n\
                 ## REQUIRED OUTPUT FORMAT (follow exactly)\n\
                 FINAL HIRING DECISION\n\n\
                 Decision: [HIRE|HOLD|REJECT]\n\n\
                 Summary:\n\
                 - Round 1 (Screening): [decision] — [brief note]\n\
                 - Round 2 (Technical): [decision] — [brief note]\n\
                 - Round 3 (Scenario): [decision] — [brief note]\n\n\
                 Overall Assessment: [detailed rationale]",
                r1 = r.screening_verdict,
                r2 = r.technical_verdict,
                r3 = r.scenario_verdict,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn committee() -> RoundRequest {
        RoundRequest::Committee(CommitteeRequest {
            screening_verdict: "Decision: PASS\nstrong resume".into(),
            technical_verdict: "Decision: PASS\nsolid answers".into(),
            scenario_verdict: "Decision: BORDERLINE\nreasonable".into(),
        })
    }

    #[test]
    fn rounds_and_kinds() {
        let req = RoundRequest::Screening(ScreeningRequest {
            resume: "r".into(),
            role: "Backend Engineer".into(),
        });
        assert_eq!(req.round(), Round::Screening);
        assert_eq!(req.kind(), "screening");
        assert_eq!(committee().round(), Round::Committee);
        assert_eq!(committee().kind(), "committee");
    }

    #[test]
    fn question_generation_skips_decision_parsing() {
        let req = RoundRequest::TechnicalQuestions(TechnicalQuestionsRequest {
            resume: "r".into(),
            screening_verdict: "v".into(),
        });
        assert!(!req.expects_decision());
        let req = RoundRequest::ScenarioQuestion(ScenarioQuestionRequest {
            resume: "r".into(),
            screening_verdict: "v1".into(),
            technical_verdict: "v2".into(),
        });
        assert!(!req.expects_decision());
        assert!(committee().expects_decision());
    }

    #[test]
    fn screening_render_includes_role_and_resume() {
        let req = RoundRequest::Screening(ScreeningRequest {
            resume: "5 years backend, Go, Postgres".into(),
            role: "Backend Engineer".into(),
        });
        let prompt = req.render();
        assert!(prompt.contains("Backend Engineer"));
        assert!(prompt.contains("5 years backend, Go, Postgres"));
        assert!(prompt.contains("Decision: [PASS|BORDERLINE|FAIL]"));
    }

    #[test]
    fn evaluation_render_includes_answer() {
        let req = RoundRequest::TechnicalEvaluation(TechnicalEvaluationRequest {
            resume: "resume text".into(),
            screening_verdict: "round1 verdict".into(),
            questions: "1. Explain caching".into(),
            answer: "I'd use an LRU cache with TTL".into(),
        });
        let prompt = req.render();
        assert!(prompt.contains("round1 verdict"));
        assert!(prompt.contains("I'd use an LRU cache with TTL"));
    }

    #[test]
    fn committee_render_carries_verdicts_only() {
        let resume = "TOP SECRET RESUME";
        let answer = "TOP SECRET ANSWER";
        let prompt = committee().render();
        assert!(prompt.contains("strong resume"));
        assert!(prompt.contains("solid answers"));
        assert!(prompt.contains("reasonable"));
        assert!(!prompt.contains(resume));
        assert!(!prompt.contains(answer));
        assert!(prompt.contains("Decision: [HIRE|HOLD|REJECT]"));
    }
}
