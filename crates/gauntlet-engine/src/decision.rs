use std::sync::OnceLock;

use regex::Regex;

use gauntlet_core::rounds::Decision;

/// Keyword fallback, scanned in this fixed priority order. Negative signals
/// outrank positive ones when keywords co-occur.
const FALLBACK_ORDER: [(&str, Decision); 6] = [
    ("FAIL", Decision::Fail),
    ("REJECT", Decision::Reject),
    ("BORDERLINE", Decision::Borderline),
    ("HOLD", Decision::Hold),
    ("PASS", Decision::Pass),
    ("HIRE", Decision::Hire),
];

fn decision_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)decision:\s*(PASS|FAIL|BORDERLINE|HIRE|HOLD|REJECT)")
            .expect("decision regex is valid")
    })
}

/// Extract the categorical decision from free-form verdict text.
///
/// Primary: the first `Decision: <TOKEN>` occurrence, case-insensitive.
/// Fallback: the first FALLBACK_ORDER keyword present anywhere in the text.
/// Default: BORDERLINE — conservative and non-terminal.
///
/// Pure and deterministic for identical input.
pub fn parse_decision(text: &str) -> Decision {
    if let Some(caps) = decision_line().captures(text) {
        if let Ok(decision) = caps[1].to_ascii_uppercase().parse() {
            return decision;
        }
    }

    let upper = text.to_ascii_uppercase();
    for (keyword, decision) in FALLBACK_ORDER {
        if upper.contains(keyword) {
            return decision;
        }
    }

    Decision::Borderline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_line_wins() {
        let text = "ROUND 1 — SCREENING\n\nDecision: PASS\nScore: 8 / 10\n\nReasoning: strong fit.";
        assert_eq!(parse_decision(text), Decision::Pass);
    }

    #[test]
    fn line_is_case_insensitive() {
        assert_eq!(parse_decision("decision: fail"), Decision::Fail);
        assert_eq!(parse_decision("DECISION:   hire"), Decision::Hire);
    }

    #[test]
    fn line_beats_fallback_keywords() {
        // PASS appears first in the body, but the decision line says FAIL
        let text = "The candidate could not PASS muster.\nDecision: FAIL\nWeak answers overall.";
        assert_eq!(parse_decision(text), Decision::Fail);
    }

    #[test]
    fn first_decision_line_wins() {
        let text = "Decision: HOLD\nEarlier draft said Decision: HIRE";
        assert_eq!(parse_decision(text), Decision::Hold);
    }

    #[test]
    fn fallback_single_keyword() {
        assert_eq!(parse_decision("the committee leans toward hire"), Decision::Hire);
        assert_eq!(parse_decision("clearly borderline performance"), Decision::Borderline);
        assert_eq!(parse_decision("we should hold for now"), Decision::Hold);
    }

    #[test]
    fn fallback_priority_fail_over_pass() {
        let text = "Some answers pass, but overall the candidate fails the bar.";
        assert_eq!(parse_decision(text), Decision::Fail);
    }

    #[test]
    fn fallback_priority_reject_over_hold() {
        let text = "Recommend we hold, though some argued to reject.";
        assert_eq!(parse_decision(text), Decision::Reject);
    }

    #[test]
    fn no_keyword_defaults_to_borderline() {
        assert_eq!(parse_decision("inconclusive assessment"), Decision::Borderline);
        assert_eq!(parse_decision(""), Decision::Borderline);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let text = "Decision: BORDERLINE\nmixed signal";
        assert_eq!(parse_decision(text), parse_decision(text));
    }

    #[test]
    fn all_tokens_recognized_on_line() {
        for (token, expected) in [
            ("PASS", Decision::Pass),
            ("FAIL", Decision::Fail),
            ("BORDERLINE", Decision::Borderline),
            ("HIRE", Decision::Hire),
            ("HOLD", Decision::Hold),
            ("REJECT", Decision::Reject),
        ] {
            let text = format!("Decision: {token}\nRationale follows.");
            assert_eq!(parse_decision(&text), expected, "token: {token}");
        }
    }
}
