//! Completeness check: flags empty, unexpectedly short, or abruptly
//! cut-off content.
//!
//! A failure here does not short-circuit the pipeline -- the format check
//! still runs so the terminal record describes everything wrong with the
//! artifact, not just the first problem.

use crate::content::ReviewContent;
use crate::review::{TargetType, CODE_CONTENT_EMPTY, CODE_CONTENT_TRUNCATED};
use crate::validators::CheckOutcome;

/// Content shorter than this (after trimming) is treated as truncated.
pub const MIN_CONTENT_LENGTH: usize = 50;

/// Confidence contributed by a passing completeness check.
pub const COMPLETENESS_CONFIDENCE: i16 = 85;

/// Characters a prose artifact may legitimately end with.
const TERMINAL_CHARS: &[char] = &['.', '!', '?', '"', '\'', ')', ']', '`', ':', '|'];

/// Check content for truncation.
///
/// Rules:
/// - empty or whitespace-only body fails with `CONTENT_EMPTY`;
/// - body shorter than [`MIN_CONTENT_LENGTH`] fails with `CONTENT_TRUNCATED`;
/// - for reports and documents, a body whose last line ends mid-sentence
///   (no terminal punctuation, or a trailing ellipsis) fails with
///   `CONTENT_TRUNCATED`. Chat messages are exempt from the punctuation
///   heuristic -- short unpunctuated messages are normal.
pub fn completeness_check(content: &ReviewContent) -> CheckOutcome {
    let body = content.body.trim();

    if body.is_empty() {
        return CheckOutcome::Fail {
            code: CODE_CONTENT_EMPTY,
            message: "Content is empty".to_string(),
        };
    }

    if body.chars().count() < MIN_CONTENT_LENGTH {
        return CheckOutcome::Fail {
            code: CODE_CONTENT_TRUNCATED,
            message: format!(
                "Content is only {} characters (minimum {MIN_CONTENT_LENGTH})",
                body.chars().count()
            ),
        };
    }

    if prose_target(content.target_type) && ends_abruptly(body) {
        return CheckOutcome::Fail {
            code: CODE_CONTENT_TRUNCATED,
            message: "Content appears cut off mid-sentence".to_string(),
        };
    }

    CheckOutcome::Pass {
        confidence: Some(COMPLETENESS_CONFIDENCE),
    }
}

/// Whether the punctuation heuristic applies to this target type.
fn prose_target(target_type: TargetType) -> bool {
    matches!(target_type, TargetType::Report | TargetType::Document)
}

/// A trailing ellipsis or a last character outside the terminal set
/// indicates a mid-sentence cutoff.
fn ends_abruptly(body: &str) -> bool {
    if body.ends_with("...") || body.ends_with('\u{2026}') {
        return true;
    }
    match body.chars().last() {
        Some(last) => !TERMINAL_CHARS.contains(&last) && !last.is_ascii_digit(),
        None => true,
    }
}
