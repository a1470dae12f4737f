//! Format check: target-type-specific structural expectations.
//!
//! The producer declares which section headings an artifact must contain
//! (carried in [`ReviewContent::expected_sections`]); this check verifies
//! each one is present. Artifacts with no declared sections pass trivially.

use crate::content::ReviewContent;
use crate::review::CODE_MISSING_SECTIONS;
use crate::validators::CheckOutcome;

/// Confidence contributed by a passing format check.
pub const FORMAT_CONFIDENCE: i16 = 90;

/// Verify every expected section heading appears in the content
/// (case-insensitive substring match).
pub fn format_check(content: &ReviewContent) -> CheckOutcome {
    let body_lower = content.body.to_lowercase();

    let missing: Vec<&str> = content
        .expected_sections
        .iter()
        .filter(|section| !body_lower.contains(&section.to_lowercase()))
        .map(String::as_str)
        .collect();

    if missing.is_empty() {
        CheckOutcome::Pass {
            confidence: Some(FORMAT_CONFIDENCE),
        }
    } else {
        CheckOutcome::Fail {
            code: CODE_MISSING_SECTIONS,
            message: format!("Missing expected sections: {}", missing.join(", ")),
        }
    }
}
