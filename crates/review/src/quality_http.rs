//! HTTP implementation of the generative quality capability.
//!
//! POSTs a low-token judgment request to a configured scoring endpoint
//! and expects a structured `{passed, score, reason}` reply. All failure
//! modes map to [`QualityError`] variants the pipeline converts into a
//! degraded-confidence pass.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use qbee_core::validators::quality::{QualityBackend, QualityError, QualityJudgment};

/// Default request timeout for a judgment call.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Model name recorded when the backend does not advertise one.
const DEFAULT_MODEL: &str = "quality-judge";

/// Instruction sent alongside the content. Kept short on purpose -- the
/// judgment call must stay low-latency and low-token.
const JUDGE_INSTRUCTIONS: &str = "Judge whether this AI-generated content is complete, \
    coherent, and deliverable. Reply with passed (bool), score (0-100), and a one-line reason.";

#[derive(Debug, Serialize)]
struct JudgmentRequest<'a> {
    model: &'a str,
    instructions: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct JudgmentResponse {
    passed: bool,
    score: i16,
    reason: String,
}

/// A quality backend reached over HTTP.
pub struct HttpQualityBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl HttpQualityBackend {
    pub fn new(endpoint: String, model: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            endpoint,
            model,
        }
    }

    /// Build a backend from environment variables, or `None` when no
    /// endpoint is configured (the pipeline then runs structural-only).
    ///
    /// | Env Var                | Default           |
    /// |------------------------|-------------------|
    /// | `QUALITY_BACKEND_URL`  | unset (disabled)  |
    /// | `QUALITY_MODEL`        | `quality-judge`   |
    /// | `QUALITY_TIMEOUT_SECS` | `30`              |
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("QUALITY_BACKEND_URL").ok()?;
        let model =
            std::env::var("QUALITY_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout_secs: u64 = std::env::var("QUALITY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Some(Self::new(endpoint, model, Duration::from_secs(timeout_secs)))
    }
}

#[async_trait]
impl QualityBackend for HttpQualityBackend {
    async fn score(&self, content: &str) -> Result<QualityJudgment, QualityError> {
        let request = JudgmentRequest {
            model: &self.model,
            instructions: JUDGE_INSTRUCTIONS,
            content,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QualityError::Timeout
                } else {
                    QualityError::Unreachable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(QualityError::Unreachable(format!(
                "backend returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let judgment: JudgmentResponse = response
            .json()
            .await
            .map_err(|e| QualityError::Malformed(e.to_string()))?;

        Ok(QualityJudgment {
            passed: judgment.passed,
            score: judgment.score.clamp(0, 100),
            reason: judgment.reason,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
