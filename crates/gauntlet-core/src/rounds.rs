use serde::{Deserialize, Serialize};

/// The four sequential evaluation rounds. Rounds 1-3 each produce a persisted
/// verdict; the committee round consumes those verdicts and nothing else.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Round {
    Screening,
    Technical,
    Scenario,
    Committee,
}

impl Round {
    /// Rounds that persist a verdict record, in execution order.
    pub const VERDICT_ROUNDS: [Round; 3] = [Round::Screening, Round::Technical, Round::Scenario];

    pub fn number(self) -> u8 {
        match self {
            Self::Screening => 1,
            Self::Technical => 2,
            Self::Scenario => 3,
            Self::Committee => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Screening),
            2 => Some(Self::Technical),
            3 => Some(Self::Scenario),
            4 => Some(Self::Committee),
            _ => None,
        }
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Screening => write!(f, "screening"),
            Self::Technical => write!(f, "technical"),
            Self::Scenario => write!(f, "scenario"),
            Self::Committee => write!(f, "committee"),
        }
    }
}

/// Categorical outcome extracted from a verdict. PASS/FAIL/BORDERLINE come
/// from the evaluation rounds, HIRE/HOLD/REJECT from the committee.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Pass,
    Fail,
    Borderline,
    Hire,
    Hold,
    Reject,
}

impl Decision {
    pub fn token(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Borderline => "BORDERLINE",
            Self::Hire => "HIRE",
            Self::Hold => "HOLD",
            Self::Reject => "REJECT",
        }
    }

    /// Only an explicit FAIL terminates the pipeline early; BORDERLINE
    /// advances like PASS.
    pub fn is_fail(self) -> bool {
        matches!(self, Self::Fail)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl std::str::FromStr for Decision {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PASS" => Ok(Self::Pass),
            "FAIL" => Ok(Self::Fail),
            "BORDERLINE" => Ok(Self::Borderline),
            "HIRE" => Ok(Self::Hire),
            "HOLD" => Ok(Self::Hold),
            "REJECT" => Ok(Self::Reject),
            other => Err(format!("unknown decision: {other}")),
        }
    }
}

/// Lifecycle of the active interview session. REJECTED and COMPLETE are
/// terminal; only the final decision may still be queried afterwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InterviewStatus {
    Ongoing,
    Rejected,
    Complete,
}

impl InterviewStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Complete)
    }
}

impl std::fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ONGOING"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::Complete => write!(f, "COMPLETE"),
        }
    }
}

impl std::str::FromStr for InterviewStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ONGOING" => Ok(Self::Ongoing),
            "REJECTED" => Ok(Self::Rejected),
            "COMPLETE" => Ok(Self::Complete),
            other => Err(format!("unknown interview status: {other}")),
        }
    }
}
