//! Review service orchestration.
//!
//! [`ReviewService`] is the sole writer of `review_jobs` and
//! `review_history`. Producers enqueue through it, workers claim and
//! report through it, and the admin surface re-queues through it.

use qbee_core::content::{FetchError, ReviewContent};
use qbee_core::error::CoreError;
use qbee_core::review::{validate_priority, ReviewOutcome, ReviewType, TargetType};
use qbee_core::types::DbId;
use qbee_db::models::review_job::{QueueReview, ReviewJob};
use qbee_db::models::status::ReviewStatus;
use qbee_db::repositories::{ReviewHistoryRepo, ReviewJobRepo};
use qbee_db::DbPool;
use qbee_notify::WebhookDispatcher;

use crate::fetcher::ContentFetcher;

/// Errors surfaced by the orchestration layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Orchestrates the review job lifecycle: enqueue, claim, content
/// resolution, completion, and webhook notification.
pub struct ReviewService {
    pool: DbPool,
    fetcher: ContentFetcher,
    dispatcher: WebhookDispatcher,
}

impl ReviewService {
    pub fn new(pool: DbPool, fetcher: ContentFetcher, dispatcher: WebhookDispatcher) -> Self {
        Self {
            pool,
            fetcher,
            dispatcher,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Enqueue a review job. Synchronous insert, asynchronous processing
    /// -- the producer is never blocked on the review itself.
    pub async fn queue_review(&self, input: &QueueReview) -> Result<ReviewJob, ServiceError> {
        TargetType::parse(&input.target_type)?;
        ReviewType::parse(&input.review_type)?;
        if let Some(priority) = input.priority {
            validate_priority(priority)?;
        }

        let job = ReviewJobRepo::insert(&self.pool, input).await?;
        tracing::info!(
            job_id = job.id,
            target_type = %job.target_type,
            target_id = %job.target_id,
            priority = job.priority,
            "Review job queued"
        );
        Ok(job)
    }

    /// Atomically claim the next pending job for a worker, or `None`
    /// when the queue is empty (the worker backs off and polls again).
    pub async fn get_next_review(
        &self,
        worker_id: &str,
    ) -> Result<Option<ReviewJob>, ServiceError> {
        let claimed = ReviewJobRepo::claim_next(&self.pool, worker_id).await?;
        if let Some(job) = &claimed {
            tracing::info!(
                job_id = job.id,
                worker_id,
                target_type = %job.target_type,
                "Review job claimed"
            );
        }
        Ok(claimed)
    }

    /// Resolve a job's target into reviewable content via the fetcher
    /// registry. A failure here becomes a `CONTENT_FETCH_FAILED` error
    /// completion -- it is not retried.
    pub async fn get_content_for_review(
        &self,
        target_type: TargetType,
        target_id: &str,
    ) -> Result<ReviewContent, FetchError> {
        self.fetcher.fetch(target_type, target_id).await
    }

    /// Record a job's terminal result and notify subscribers.
    ///
    /// The terminal status update and the history insert share one
    /// transaction; webhook delivery happens after commit so a delivery
    /// failure can never roll back the recorded result. Returns `false`
    /// (and writes nothing) when the job is no longer in `reviewing`
    /// under the claiming worker recorded in `job` -- e.g. already
    /// completed, or reclaimed by the lease sweep and handed to someone
    /// else. `job` must be the snapshot the worker received from its
    /// claim, worker stamp included.
    pub async fn complete_review(
        &self,
        job: &ReviewJob,
        outcome: &ReviewOutcome,
        processing_time_ms: i32,
    ) -> Result<bool, ServiceError> {
        let Some(worker_id) = job.worker_id.as_deref() else {
            tracing::warn!(job_id = job.id, "Completion ignored: job carries no worker stamp");
            return Ok(false);
        };

        let status = ReviewStatus::from_verdict(outcome.verdict);

        let mut tx = self.pool.begin().await?;

        let updated = ReviewJobRepo::mark_completed(
            &mut *tx,
            job.id,
            worker_id,
            status,
            &outcome.result_code,
            &outcome.message,
            outcome.confidence_score,
        )
        .await?;

        if !updated {
            tx.rollback().await?;
            tracing::warn!(
                job_id = job.id,
                worker_id,
                result_code = %outcome.result_code,
                "Completion ignored: job is not in reviewing state under this worker"
            );
            return Ok(false);
        }

        ReviewHistoryRepo::insert(
            &mut *tx,
            job.id,
            &job.target_type,
            &job.target_id,
            &outcome.result_code,
            outcome.model_used.as_deref(),
            processing_time_ms,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            job_id = job.id,
            result_code = %outcome.result_code,
            confidence = ?outcome.confidence_score,
            processing_time_ms,
            "Review completed"
        );

        // Best-effort, post-commit. Failures are logged and counted
        // inside the dispatcher, never raised here.
        self.dispatcher.dispatch(&self.pool, job, outcome).await;

        Ok(true)
    }

    /// Administrative re-queue of a failed or errored job.
    ///
    /// Inserts a fresh pending copy with provenance; the original keeps
    /// its terminal record.
    pub async fn retry_review(&self, job_id: DbId) -> Result<ReviewJob, ServiceError> {
        let original = ReviewJobRepo::find_by_id(&self.pool, job_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ReviewJob",
                id: job_id,
            })?;

        let retryable = original.status_id == ReviewStatus::Failed.id()
            || original.status_id == ReviewStatus::Error.id();
        if !retryable {
            return Err(CoreError::Conflict(format!(
                "Job {job_id} is not in a retryable state"
            ))
            .into());
        }

        let requeued = ReviewJobRepo::requeue(&self.pool, &original).await?;
        tracing::info!(
            job_id = requeued.id,
            retry_of = original.id,
            "Review job re-queued"
        );
        Ok(requeued)
    }
}
