//! Review domain types: target/review type enums, result codes, and the
//! pipeline outcome that workers report back to the review service.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Target types
// ---------------------------------------------------------------------------

/// The kind of artifact a review job points at.
///
/// Each variant maps to one producer subsystem's read API. Adding a new
/// producer means adding a variant here and registering a content source
/// for it -- no string branching anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Report,
    Message,
    Document,
    PiiDetection,
}

impl TargetType {
    /// All target types, in registration order.
    pub const ALL: [TargetType; 4] = [
        TargetType::Report,
        TargetType::Message,
        TargetType::Document,
        TargetType::PiiDetection,
    ];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            TargetType::Report => "report",
            TargetType::Message => "message",
            TargetType::Document => "document",
            TargetType::PiiDetection => "pii_detection",
        }
    }

    /// Parse the database / wire representation.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "report" => Ok(TargetType::Report),
            "message" => Ok(TargetType::Message),
            "document" => Ok(TargetType::Document),
            "pii_detection" => Ok(TargetType::PiiDetection),
            other => Err(CoreError::Validation(format!(
                "Unknown target type: '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Review types
// ---------------------------------------------------------------------------

/// What kind of review was requested for the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewType {
    OutputValidation,
    PiiCheck,
    Completeness,
    Format,
}

impl ReviewType {
    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewType::OutputValidation => "output_validation",
            ReviewType::PiiCheck => "pii_check",
            ReviewType::Completeness => "completeness",
            ReviewType::Format => "format",
        }
    }

    /// Parse the database / wire representation.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "output_validation" => Ok(ReviewType::OutputValidation),
            "pii_check" => Ok(ReviewType::PiiCheck),
            "completeness" => Ok(ReviewType::Completeness),
            "format" => Ok(ReviewType::Format),
            other => Err(CoreError::Validation(format!(
                "Unknown review type: '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Priorities
// ---------------------------------------------------------------------------

/// Highest priority a producer may request.
pub const PRIORITY_HIGHEST: i32 = 1;
/// Lowest priority a producer may request.
pub const PRIORITY_LOWEST: i32 = 10;
/// Priority assigned when the producer does not specify one.
pub const PRIORITY_DEFAULT: i32 = 5;

/// Validate a requested priority (1 = highest .. 10 = lowest).
pub fn validate_priority(priority: i32) -> Result<(), CoreError> {
    if !(PRIORITY_HIGHEST..=PRIORITY_LOWEST).contains(&priority) {
        return Err(CoreError::Validation(format!(
            "priority must be between {PRIORITY_HIGHEST} and {PRIORITY_LOWEST}, got {priority}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Result codes
// ---------------------------------------------------------------------------

/// All structural checks passed (possibly with a degraded-quality warning).
pub const CODE_PASSED: &str = "PASSED";
/// A residual redaction placeholder token was found in the content.
pub const CODE_PII_LEAK: &str = "PII_LEAK_DETECTED";
/// Content was empty or whitespace-only.
pub const CODE_CONTENT_EMPTY: &str = "CONTENT_EMPTY";
/// Content was unexpectedly short or cut off mid-sentence.
pub const CODE_CONTENT_TRUNCATED: &str = "CONTENT_TRUNCATED";
/// One or more expected structural sections were missing.
pub const CODE_MISSING_SECTIONS: &str = "MISSING_SECTIONS";
/// The generative quality backend judged the content a failure.
pub const CODE_QUALITY_REJECTED: &str = "QUALITY_REJECTED";
/// The target could not be resolved to content.
pub const CODE_CONTENT_FETCH_FAILED: &str = "CONTENT_FETCH_FAILED";
/// A fault inside the validator pipeline itself.
pub const CODE_REVIEW_ERROR: &str = "REVIEW_ERROR";

/// Every result code a completed job can carry. Used to validate
/// webhook filter allow-lists.
pub const VALID_RESULT_CODES: &[&str] = &[
    CODE_PASSED,
    CODE_PII_LEAK,
    CODE_CONTENT_EMPTY,
    CODE_CONTENT_TRUNCATED,
    CODE_MISSING_SECTIONS,
    CODE_QUALITY_REJECTED,
    CODE_CONTENT_FETCH_FAILED,
    CODE_REVIEW_ERROR,
];

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Terminal disposition of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Passed,
    Failed,
    Error,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Passed => "passed",
            Verdict::Failed => "failed",
            Verdict::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "passed" => Ok(Verdict::Passed),
            "failed" => Ok(Verdict::Failed),
            "error" => Ok(Verdict::Error),
            other => Err(CoreError::Validation(format!("Unknown verdict: '{other}'"))),
        }
    }
}

/// The aggregated result of running the validator pipeline (or of a
/// fetch/pipeline fault) for one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub verdict: Verdict,
    pub result_code: String,
    /// 0–100; present for passes, absent for most failures.
    pub confidence_score: Option<i16>,
    pub message: String,
    /// Generative model that contributed to the judgment, if one ran.
    pub model_used: Option<String>,
}

impl ReviewOutcome {
    pub fn passed(confidence_score: i16, message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Passed,
            result_code: CODE_PASSED.to_string(),
            confidence_score: Some(confidence_score),
            message: message.into(),
            model_used: None,
        }
    }

    pub fn failed(result_code: &str, message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Failed,
            result_code: result_code.to_string(),
            confidence_score: None,
            message: message.into(),
            model_used: None,
        }
    }

    pub fn error(result_code: &str, message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Error,
            result_code: result_code.to_string(),
            confidence_score: None,
            message: message.into(),
            model_used: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_used = Some(model.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
