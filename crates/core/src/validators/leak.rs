//! Residual-placeholder leak check.
//!
//! The upstream redaction pipeline replaces sensitive spans with bracketed
//! tokens like `[PII_EMAIL_ab12cd34]` before content leaves the producer.
//! Any such token still present in a finished artifact means the
//! de-redaction step was skipped or failed -- the content must never be
//! delivered, regardless of what later checks would say.

use std::sync::LazyLock;

use regex::Regex;

use crate::content::ReviewContent;
use crate::review::CODE_PII_LEAK;
use crate::validators::CheckOutcome;

/// Regex matching a residual redaction token: `[PII_<KIND>_<8 hex>]` or
/// `[REDACTED_<KIND>_<8 hex>]`.
pub const LEAK_TOKEN_PATTERN: &str = r"\[(?:PII|REDACTED)_[A-Z0-9]+_[0-9a-fA-F]{8}\]";

/// Compiled leak-token regex. Compiled once, reused forever.
static LEAK_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LEAK_TOKEN_PATTERN).expect("valid regex"));

/// Scan content for residual redaction tokens.
///
/// Any match is an immediate hard fail that short-circuits the rest of
/// the pipeline. A pass carries no confidence score -- absence of a leak
/// is a gate, not a grade.
pub fn leak_check(content: &ReviewContent) -> CheckOutcome {
    match LEAK_TOKEN_RE.find(&content.body) {
        Some(m) => CheckOutcome::Fail {
            code: CODE_PII_LEAK,
            message: format!("Residual redaction token found: {}", m.as_str()),
        },
        None => CheckOutcome::Pass { confidence: None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::TargetType;

    fn content(body: &str) -> ReviewContent {
        ReviewContent {
            target_type: TargetType::Report,
            target_id: "R1".into(),
            body: body.into(),
            expected_sections: Vec::new(),
        }
    }

    #[test]
    fn clean_content_passes() {
        let outcome = leak_check(&content("Quarterly revenue grew by 12%."));
        assert_eq!(outcome, CheckOutcome::Pass { confidence: None });
    }

    #[test]
    fn pii_token_fails() {
        let outcome = leak_check(&content("Contact [PII_EMAIL_ab12cd34] for details."));
        match outcome {
            CheckOutcome::Fail { code, message } => {
                assert_eq!(code, CODE_PII_LEAK);
                assert!(message.contains("[PII_EMAIL_ab12cd34]"));
            }
            other => panic!("expected fail, got {other:?}"),
        }
    }

    #[test]
    fn redacted_token_fails() {
        let outcome = leak_check(&content("See [REDACTED_SSN_deadbeef]."));
        assert!(outcome.is_fail());
    }

    #[test]
    fn token_alone_fails() {
        // End-to-end scenario: content that is nothing but a leaked token.
        assert!(leak_check(&content("[PII_EMAIL_ab12cd34]")).is_fail());
    }

    #[test]
    fn lookalike_brackets_pass() {
        // Ordinary bracketed text is not a redaction token.
        assert!(!leak_check(&content("[see appendix A]")).is_fail());
        assert!(!leak_check(&content("[PII_EMAIL]")).is_fail());
        assert!(!leak_check(&content("[PII_EMAIL_xyz]")).is_fail());
    }
}
