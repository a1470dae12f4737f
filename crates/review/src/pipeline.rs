//! Validator pipeline executor.
//!
//! Runs the ordered checks from `qbee-core` against fetched content and
//! aggregates them into one [`ReviewOutcome`]:
//!
//! 1. leak check -- any residual redaction token is an immediate fail that
//!    short-circuits everything else;
//! 2. completeness -- a failure is recorded but the format check still
//!    runs, so the terminal record is as descriptive as possible;
//! 3. format -- expected sections present;
//! 4. generative quality -- only when the structural checks all passed and
//!    a backend is configured; an unreachable backend degrades confidence
//!    instead of failing.
//!
//! The final result is the first hard fail, or a pass with the minimum
//! confidence across every check that produced a score.

use std::sync::Arc;

use qbee_core::content::ReviewContent;
use qbee_core::review::{ReviewOutcome, CODE_QUALITY_REJECTED};
use qbee_core::validators::quality::{QualityBackend, DEGRADED_CONFIDENCE};
use qbee_core::validators::{completeness_check, format_check, leak_check, CheckOutcome};

/// Executes the ordered validator checks for one piece of content.
pub struct ValidatorPipeline {
    quality: Option<Arc<dyn QualityBackend>>,
}

impl ValidatorPipeline {
    /// A pipeline with no generative backend: structural checks only,
    /// passes carry degraded confidence.
    pub fn structural_only() -> Self {
        Self { quality: None }
    }

    /// A pipeline that consults the given backend after the structural
    /// checks pass.
    pub fn with_quality(backend: Arc<dyn QualityBackend>) -> Self {
        Self {
            quality: Some(backend),
        }
    }

    /// Run all checks and aggregate the result. Infallible: every
    /// degraded condition is folded into the outcome rather than raised.
    pub async fn run(&self, content: &ReviewContent) -> ReviewOutcome {
        // A sensitive-data leak is never overridden by a later
        // "looks fine" signal.
        if let CheckOutcome::Fail { code, message } = leak_check(content) {
            return ReviewOutcome::failed(code, message);
        }

        let completeness = completeness_check(content);
        let format = format_check(content);

        let mut failures: Vec<(&'static str, String)> = Vec::new();
        let mut scores: Vec<i16> = Vec::new();

        for outcome in [&completeness, &format] {
            match outcome {
                CheckOutcome::Fail { code, message } => {
                    failures.push((code, message.clone()));
                }
                CheckOutcome::Pass { confidence } => {
                    if let Some(score) = confidence {
                        scores.push(*score);
                    }
                }
            }
        }

        // First hard fail wins; later failures enrich the message.
        if let Some((code, _)) = failures.first() {
            let message = failures
                .iter()
                .map(|(_, m)| m.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return ReviewOutcome::failed(code, message);
        }

        // Structural checks passed: consult the generative backend if
        // one is configured. Its absence or unavailability lowers
        // confidence but never blocks completion.
        let mut model_used: Option<String> = None;
        let mut warning: Option<String> = None;

        match &self.quality {
            Some(backend) => match backend.score(&content.body).await {
                Ok(judgment) => {
                    if !judgment.passed {
                        return ReviewOutcome::failed(CODE_QUALITY_REJECTED, judgment.reason)
                            .with_model(backend.model());
                    }
                    model_used = Some(backend.model().to_string());
                    scores.push(judgment.score.clamp(0, 100));
                }
                Err(e) => {
                    tracing::warn!(
                        target_id = %content.target_id,
                        error = %e,
                        "Quality backend unavailable, passing with reduced confidence"
                    );
                    warning = Some(format!("quality check skipped: {e}"));
                    scores.push(DEGRADED_CONFIDENCE);
                }
            },
            None => {
                scores.push(DEGRADED_CONFIDENCE);
            }
        }

        let confidence = scores.iter().copied().min().unwrap_or(DEGRADED_CONFIDENCE);
        let message = match warning {
            Some(w) => format!("All checks passed ({w})"),
            None => "All checks passed".to_string(),
        };

        let mut outcome = ReviewOutcome::passed(confidence, message);
        outcome.model_used = model_used;
        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use qbee_core::review::{
        TargetType, Verdict, CODE_CONTENT_TRUNCATED, CODE_MISSING_SECTIONS, CODE_PII_LEAK,
    };
    use qbee_core::validators::completeness::COMPLETENESS_CONFIDENCE;
    use qbee_core::validators::quality::{QualityError, QualityJudgment};

    use super::*;

    const GOOD_REPORT: &str = "# Summary\nRevenue grew twelve percent quarter over quarter.\n\
                               # Findings\nCosts were flat while sales volume increased.";

    fn report(body: &str, sections: &[&str]) -> ReviewContent {
        ReviewContent {
            target_type: TargetType::Report,
            target_id: "R1".into(),
            body: body.into(),
            expected_sections: sections.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Deterministic stand-in for a generative backend.
    struct StubBackend {
        result: Result<QualityJudgment, ()>,
    }

    impl StubBackend {
        fn passing(score: i16) -> Self {
            Self {
                result: Ok(QualityJudgment {
                    passed: true,
                    score,
                    reason: "coherent and on-topic".into(),
                }),
            }
        }

        fn rejecting() -> Self {
            Self {
                result: Ok(QualityJudgment {
                    passed: false,
                    score: 20,
                    reason: "content is incoherent".into(),
                }),
            }
        }

        fn unreachable() -> Self {
            Self { result: Err(()) }
        }
    }

    #[async_trait]
    impl QualityBackend for StubBackend {
        async fn score(&self, _content: &str) -> Result<QualityJudgment, QualityError> {
            match &self.result {
                Ok(j) => Ok(j.clone()),
                Err(()) => Err(QualityError::Unreachable("connection refused".into())),
            }
        }

        fn model(&self) -> &str {
            "stub-judge-1"
        }
    }

    #[tokio::test]
    async fn clean_report_passes_structural_only() {
        let pipeline = ValidatorPipeline::structural_only();
        let outcome = pipeline
            .run(&report(GOOD_REPORT, &["Summary", "Findings"]))
            .await;

        assert_eq!(outcome.verdict, Verdict::Passed);
        assert_eq!(outcome.confidence_score, Some(DEGRADED_CONFIDENCE));
        assert!(outcome.model_used.is_none());
    }

    #[tokio::test]
    async fn leak_short_circuits_everything() {
        // Content that would also fail completeness and format; the leak
        // code must win regardless.
        let pipeline = ValidatorPipeline::with_quality(Arc::new(StubBackend::passing(99)));
        let outcome = pipeline
            .run(&report("[PII_EMAIL_ab12cd34]", &["Summary"]))
            .await;

        assert_eq!(outcome.verdict, Verdict::Failed);
        assert_eq!(outcome.result_code, CODE_PII_LEAK);
    }

    #[tokio::test]
    async fn completeness_fail_still_reports_format_problems() {
        let pipeline = ValidatorPipeline::structural_only();
        let outcome = pipeline.run(&report("Cut off mid", &["Summary"])).await;

        assert_eq!(outcome.verdict, Verdict::Failed);
        assert_eq!(outcome.result_code, CODE_CONTENT_TRUNCATED);
        // The format check ran too and its message is included.
        assert!(outcome.message.contains("Summary"));
    }

    #[tokio::test]
    async fn missing_sections_fail() {
        let body = "# Summary\nRevenue grew twelve percent quarter over quarter this year.";
        let pipeline = ValidatorPipeline::structural_only();
        let outcome = pipeline.run(&report(body, &["Summary", "Findings"])).await;

        assert_eq!(outcome.result_code, CODE_MISSING_SECTIONS);
    }

    #[tokio::test]
    async fn quality_pass_contributes_its_score() {
        let pipeline = ValidatorPipeline::with_quality(Arc::new(StubBackend::passing(75)));
        let outcome = pipeline
            .run(&report(GOOD_REPORT, &["Summary", "Findings"]))
            .await;

        assert_eq!(outcome.verdict, Verdict::Passed);
        // min(completeness 85, format 90, quality 75) = 75.
        assert_eq!(outcome.confidence_score, Some(75));
        assert_eq!(outcome.model_used.as_deref(), Some("stub-judge-1"));
    }

    #[tokio::test]
    async fn quality_reject_fails_the_job() {
        let pipeline = ValidatorPipeline::with_quality(Arc::new(StubBackend::rejecting()));
        let outcome = pipeline
            .run(&report(GOOD_REPORT, &["Summary", "Findings"]))
            .await;

        assert_eq!(outcome.verdict, Verdict::Failed);
        assert_eq!(outcome.result_code, CODE_QUALITY_REJECTED);
        assert_eq!(outcome.model_used.as_deref(), Some("stub-judge-1"));
    }

    #[tokio::test]
    async fn unreachable_backend_degrades_instead_of_failing() {
        let degraded_pipeline =
            ValidatorPipeline::with_quality(Arc::new(StubBackend::unreachable()));
        let degraded = degraded_pipeline
            .run(&report(GOOD_REPORT, &["Summary", "Findings"]))
            .await;

        assert_eq!(degraded.verdict, Verdict::Passed);
        assert_eq!(degraded.confidence_score, Some(DEGRADED_CONFIDENCE));
        assert!(degraded.message.contains("quality check skipped"));
        assert!(degraded.model_used.is_none());

        // With a healthy backend the same content scores higher.
        let healthy_pipeline =
            ValidatorPipeline::with_quality(Arc::new(StubBackend::passing(95)));
        let healthy = healthy_pipeline
            .run(&report(GOOD_REPORT, &["Summary", "Findings"]))
            .await;

        assert_eq!(healthy.verdict, Verdict::Passed);
        assert!(healthy.confidence_score > degraded.confidence_score);
    }

    #[tokio::test]
    async fn pass_confidence_is_minimum_of_scores() {
        let pipeline = ValidatorPipeline::with_quality(Arc::new(StubBackend::passing(100)));
        let outcome = pipeline
            .run(&report(GOOD_REPORT, &["Summary", "Findings"]))
            .await;

        // min(85, 90, 100) = completeness score.
        assert_eq!(outcome.confidence_score, Some(COMPLETENESS_CONFIDENCE));
    }
}
