//! Webhook delivery for completed reviews.
//!
//! Each delivery is one HTTP POST with a short timeout. There is no
//! automatic retry: a failed delivery increments the endpoint's failure
//! counter and is logged; re-delivery is an administrative re-trigger.
//! Payloads are plain JSON with no signature (known limitation).

use std::time::Duration;

use serde::Serialize;

use qbee_core::review::ReviewOutcome;
use qbee_core::types::DbId;
use qbee_db::models::review_job::ReviewJob;
use qbee_db::repositories::WebhookRepo;
use qbee_db::DbPool;

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// JSON payload POSTed to every notified endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewCompletedEvent {
    /// Always `"review.completed"`.
    pub event: &'static str,
    pub review_id: DbId,
    pub result: ReviewResultPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewResultPayload {
    pub passed: bool,
    pub code: String,
    pub message: String,
    pub confidence: Option<i16>,
}

impl ReviewCompletedEvent {
    pub fn new(review_id: DbId, outcome: &ReviewOutcome) -> Self {
        Self {
            event: "review.completed",
            review_id,
            result: ReviewResultPayload {
                passed: outcome.verdict == qbee_core::review::Verdict::Passed,
                code: outcome.result_code.clone(),
                message: outcome.message.clone(),
                confidence: outcome.confidence_score,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// WebhookDispatcher
// ---------------------------------------------------------------------------

/// Delivers completion events to job-level and user-registered endpoints.
pub struct WebhookDispatcher {
    client: reqwest::Client,
}

impl WebhookDispatcher {
    /// Create a dispatcher with a pre-configured HTTP client.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client }
    }

    /// Notify everyone interested that a job completed.
    ///
    /// Always attempts the job's own `webhook_url` first (the producer
    /// that requested review), then fans out to the owner's active
    /// endpoints whose filters match the job's target type and result
    /// code. Never returns an error -- delivery failure must not affect
    /// the job's recorded terminal result.
    pub async fn dispatch(&self, pool: &DbPool, job: &ReviewJob, outcome: &ReviewOutcome) {
        let event = ReviewCompletedEvent::new(job.id, outcome);

        if let Some(url) = &job.webhook_url {
            match self.try_send(url, &event).await {
                Ok(()) => {
                    tracing::debug!(job_id = job.id, url, "Job webhook delivered");
                }
                Err(e) => {
                    tracing::warn!(job_id = job.id, url, error = %e, "Job webhook delivery failed");
                }
            }
        }

        let Some(user_id) = job.requested_by else {
            return;
        };

        let configs = match WebhookRepo::list_active_for_user(pool, user_id).await {
            Ok(configs) => configs,
            Err(e) => {
                tracing::error!(job_id = job.id, user_id, error = %e, "Failed to load webhook configs");
                return;
            }
        };

        for config in configs {
            if !config.matches(&job.target_type, &outcome.result_code) {
                continue;
            }

            match self.try_send(&config.url, &event).await {
                Ok(()) => {
                    if let Err(e) = WebhookRepo::increment_sent(pool, config.id).await {
                        tracing::error!(webhook_id = config.id, error = %e, "Failed to record delivery");
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        job_id = job.id,
                        webhook_id = config.id,
                        url = %config.url,
                        error = %e,
                        "Webhook delivery failed"
                    );
                    if let Err(e) = WebhookRepo::increment_failed(pool, config.id).await {
                        tracing::error!(webhook_id = config.id, error = %e, "Failed to record delivery failure");
                    }
                }
            }
        }
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, url: &str, event: &ReviewCompletedEvent) -> Result<(), WebhookError> {
        let response = self.client.post(url).json(event).send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

impl Default for WebhookDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
