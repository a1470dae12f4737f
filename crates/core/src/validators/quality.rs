//! Generative quality capability.
//!
//! The pipeline's final step delegates to an external text-generation
//! backend for a structured pass/fail/score/reason judgment. The backend
//! is strictly optional: when none is configured, or the configured one is
//! unreachable or times out, the pipeline degrades confidence instead of
//! failing -- the review system must never become the availability
//! bottleneck of the artifact pipeline it monitors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Confidence assigned to a pass when the quality backend did not
/// contribute a score (not configured, unreachable, or timed out).
pub const DEGRADED_CONFIDENCE: i16 = 70;

/// Structured judgment returned by a quality backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityJudgment {
    pub passed: bool,
    /// 0–100.
    pub score: i16,
    pub reason: String,
}

/// Why a quality judgment could not be obtained.
///
/// None of these are job errors -- the pipeline converts them into a
/// degraded-confidence pass with a warning.
#[derive(Debug, thiserror::Error)]
pub enum QualityError {
    #[error("Quality backend unreachable: {0}")]
    Unreachable(String),

    #[error("Quality backend timed out")]
    Timeout,

    #[error("Quality backend returned a malformed judgment: {0}")]
    Malformed(String),
}

/// A pluggable generative scoring capability.
#[async_trait]
pub trait QualityBackend: Send + Sync {
    /// Ask the backend for a pass/fail/score/reason judgment of `content`.
    async fn score(&self, content: &str) -> Result<QualityJudgment, QualityError>;

    /// Model identifier recorded in review history when a judgment ran.
    fn model(&self) -> &str;
}
