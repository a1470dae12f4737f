//! The review worker: a polling loop that claims jobs, resolves content,
//! runs the validator pipeline, and reports results.
//!
//! Workers are stateless and horizontally scalable -- coordination happens
//! entirely through the job store's atomic claim, so scaling out is
//! "start another worker process". Within one worker, jobs are strictly
//! sequential: a second job is never claimed before the first completes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use qbee_core::review::{ReviewOutcome, CODE_CONTENT_FETCH_FAILED, CODE_REVIEW_ERROR};
use qbee_db::models::review_job::ReviewJob;
use qbee_review::{ReviewService, ServiceError, ValidatorPipeline};

/// Default poll interval when the queue is empty.
///
/// Fixed-interval polling, not exponential backoff: job arrival is bursty
/// but not adversarial, and a bounded worst-case pickup latency matters
/// more than saving idle queries.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Stable identity stamped on claimed jobs.
    pub worker_id: String,
    /// Sleep between claim attempts when the queue is empty.
    pub poll_interval: Duration,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                  |
    /// |-----------------------------|--------------------------|
    /// | `WORKER_ID`                 | `worker-<random uuid>`   |
    /// | `REVIEW_POLL_INTERVAL_SECS` | `5`                      |
    pub fn from_env() -> Self {
        let worker_id = std::env::var("WORKER_ID")
            .unwrap_or_else(|_| format!("worker-{}", Uuid::new_v4()));

        let poll_secs: u64 = std::env::var("REVIEW_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL.as_secs());

        Self {
            worker_id,
            poll_interval: Duration::from_secs(poll_secs),
        }
    }
}

/// The polling worker loop.
pub struct ReviewWorker {
    service: Arc<ReviewService>,
    pipeline: Arc<ValidatorPipeline>,
    config: WorkerConfig,
}

impl ReviewWorker {
    pub fn new(
        service: Arc<ReviewService>,
        pipeline: Arc<ValidatorPipeline>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            service,
            pipeline,
            config,
        }
    }

    /// Run until cancelled or until the storage layer becomes
    /// unreachable. Per-job faults (fetch failures, validator faults)
    /// are contained to that job's record; only a storage error is fatal
    /// -- the process logs it and exits for the supervisor to restart.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            worker_id = %self.config.worker_id,
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "Review worker started"
        );

        loop {
            if cancel.is_cancelled() {
                tracing::info!(worker_id = %self.config.worker_id, "Review worker shutting down");
                break;
            }

            match self.process_next().await {
                // Backlog present: claim again immediately so it drains
                // as fast as possible.
                Ok(true) => continue,
                Ok(false) => {
                    tokio::select! {
                        _ = cancel.cancelled() => {}
                        _ = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                }
                Err(e) => {
                    tracing::error!(
                        worker_id = %self.config.worker_id,
                        error = %e,
                        "Storage layer unreachable, worker exiting"
                    );
                    break;
                }
            }
        }
    }

    /// One worker cycle: claim, fetch, validate, report.
    ///
    /// Returns `Ok(true)` if a job was claimed and completed, `Ok(false)`
    /// if the queue was empty.
    pub async fn process_next(&self) -> Result<bool, ServiceError> {
        let Some(job) = self.service.get_next_review(&self.config.worker_id).await? else {
            return Ok(false);
        };

        let started = Instant::now();
        let outcome = self.review_job(&job).await;
        let processing_time_ms = started.elapsed().as_millis().min(i32::MAX as u128) as i32;

        self.service
            .complete_review(&job, &outcome, processing_time_ms)
            .await?;

        Ok(true)
    }

    /// Resolve content and run the pipeline, folding every per-job fault
    /// into an outcome so the loop always makes forward progress.
    async fn review_job(&self, job: &ReviewJob) -> ReviewOutcome {
        let target_type = match job.target_type() {
            Ok(tt) => tt,
            // A row that fails to parse predates the current target set;
            // it can never be reviewed.
            Err(e) => return ReviewOutcome::error(CODE_REVIEW_ERROR, e.to_string()),
        };

        let content = match self
            .service
            .get_content_for_review(target_type, &job.target_id)
            .await
        {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(job_id = job.id, error = %e, "Content fetch failed");
                return ReviewOutcome::error(CODE_CONTENT_FETCH_FAILED, e.to_string());
            }
        };

        // Run validation on its own task so a panicking check is caught
        // and converted into an error result instead of killing the loop.
        let pipeline = Arc::clone(&self.pipeline);
        match tokio::spawn(async move { pipeline.run(&content).await }).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(job_id = job.id, error = %e, "Validator pipeline panicked");
                ReviewOutcome::error(CODE_REVIEW_ERROR, format!("validator fault: {e}"))
            }
        }
    }
}
