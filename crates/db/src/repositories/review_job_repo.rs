//! Repository for the `review_jobs` table.
//!
//! Holds the atomic claim: `SELECT ... FOR UPDATE SKIP LOCKED` is the
//! single point of mutual exclusion in the whole system. Workers share no
//! in-memory state; everything they coordinate on goes through this table.

use sqlx::{PgConnection, PgPool};

use qbee_core::review::PRIORITY_DEFAULT;
use qbee_core::types::DbId;

use crate::models::review_job::{QueueReview, QueueDepth, ReviewJob, ReviewListQuery};
use crate::models::status::{ReviewStatus, StatusId};

/// Column list for `review_jobs` queries.
const COLUMNS: &str = "\
    id, target_type, target_id, review_type, priority, status_id, \
    result_code, result_message, confidence_score, worker_id, \
    requested_by, webhook_url, retry_of_job_id, \
    created_at, claimed_at, completed_at";

/// Maximum page size for job listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for job listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides queue operations for review jobs.
pub struct ReviewJobRepo;

impl ReviewJobRepo {
    /// Create a new pending job. Returns immediately with the job row;
    /// processing happens asynchronously.
    pub async fn insert(pool: &PgPool, input: &QueueReview) -> Result<ReviewJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO review_jobs \
                 (target_type, target_id, review_type, priority, status_id, \
                  requested_by, webhook_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewJob>(&query)
            .bind(&input.target_type)
            .bind(&input.target_id)
            .bind(&input.review_type)
            .bind(input.priority.unwrap_or(PRIORITY_DEFAULT))
            .bind(ReviewStatus::Pending.id())
            .bind(input.requested_by)
            .bind(&input.webhook_url)
            .fetch_one(pool)
            .await
    }

    /// Atomically claim the next pending job for a worker.
    ///
    /// Candidates are ordered by `(priority ASC, created_at ASC)` -- lower
    /// priority number first, FIFO within a priority. `FOR UPDATE SKIP
    /// LOCKED` guarantees one winner per row under concurrent claims, and
    /// a worker blocked on I/O never blocks other workers from claiming
    /// different jobs. Status, worker id, and the lease stamp are all set
    /// before the claiming transaction commits.
    pub async fn claim_next(
        pool: &PgPool,
        worker_id: &str,
    ) -> Result<Option<ReviewJob>, sqlx::Error> {
        let query = format!(
            "UPDATE review_jobs \
             SET status_id = $2, worker_id = $1, claimed_at = NOW() \
             WHERE id = ( \
                 SELECT id FROM review_jobs \
                 WHERE status_id = $3 \
                 ORDER BY priority ASC, created_at ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewJob>(&query)
            .bind(worker_id)
            .bind(ReviewStatus::Reviewing.id())
            .bind(ReviewStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }

    /// Record a job's terminal status inside the caller's transaction.
    ///
    /// Guarded on `status_id = reviewing` AND the claiming worker's
    /// identity: returns `false` (no rows updated) when the job no longer
    /// exists, is already terminal, or has been reclaimed and handed to a
    /// different worker since this worker claimed it. Callers report
    /// that, they do not retry.
    #[allow(clippy::too_many_arguments)]
    pub async fn mark_completed(
        conn: &mut PgConnection,
        job_id: DbId,
        worker_id: &str,
        status: ReviewStatus,
        result_code: &str,
        result_message: &str,
        confidence_score: Option<i16>,
    ) -> Result<bool, sqlx::Error> {
        debug_assert!(status.is_terminal());
        let result = sqlx::query(
            "UPDATE review_jobs \
             SET status_id = $2, result_code = $3, result_message = $4, \
                 confidence_score = $5, completed_at = NOW() \
             WHERE id = $1 AND status_id = $6 AND worker_id = $7",
        )
        .bind(job_id)
        .bind(status.id())
        .bind(result_code)
        .bind(result_message)
        .bind(confidence_score)
        .bind(ReviewStatus::Reviewing.id())
        .bind(worker_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Release `reviewing` jobs whose lease has expired back to `pending`.
    ///
    /// A worker killed mid-job leaves its claim stuck in `reviewing`;
    /// this sweep makes such jobs eligible for re-claim once their
    /// `claimed_at` stamp is older than the lease. Returns the number of
    /// jobs released.
    pub async fn reclaim_expired(pool: &PgPool, lease_secs: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE review_jobs \
             SET status_id = $1, worker_id = NULL, claimed_at = NULL \
             WHERE status_id = $2 \
               AND claimed_at < NOW() - ($3 * INTERVAL '1 second')",
        )
        .bind(ReviewStatus::Pending.id())
        .bind(ReviewStatus::Reviewing.id())
        .bind(lease_secs)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Create a fresh pending copy of a terminal job.
    ///
    /// The new job carries `retry_of_job_id` pointing at the original.
    /// This is the ONLY way a failed or errored job runs again -- there is
    /// no automatic retry anywhere in the pipeline.
    pub async fn requeue(pool: &PgPool, original: &ReviewJob) -> Result<ReviewJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO review_jobs \
                 (target_type, target_id, review_type, priority, status_id, \
                  requested_by, webhook_url, retry_of_job_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewJob>(&query)
            .bind(&original.target_type)
            .bind(&original.target_id)
            .bind(&original.review_type)
            .bind(original.priority)
            .bind(ReviewStatus::Pending.id())
            .bind(original.requested_by)
            .bind(&original.webhook_url)
            .bind(original.id)
            .fetch_one(pool)
            .await
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ReviewJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM review_jobs WHERE id = $1");
        sqlx::query_as::<_, ReviewJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List jobs with optional status filter and pagination, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &ReviewListQuery,
    ) -> Result<Vec<ReviewJob>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        match params.status_id {
            Some(status_id) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM review_jobs \
                     WHERE status_id = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, ReviewJob>(&query)
                    .bind(status_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM review_jobs \
                     ORDER BY created_at DESC LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, ReviewJob>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Count pending and in-flight jobs for the queue-depth endpoint.
    pub async fn queue_depth(pool: &PgPool) -> Result<QueueDepth, sqlx::Error> {
        sqlx::query_as::<_, QueueDepth>(
            "SELECT \
                 COUNT(*) FILTER (WHERE status_id = $1) AS pending, \
                 COUNT(*) FILTER (WHERE status_id = $2) AS reviewing \
             FROM review_jobs",
        )
        .bind(ReviewStatus::Pending.id())
        .bind(ReviewStatus::Reviewing.id())
        .fetch_one(pool)
        .await
    }

    /// Count jobs currently in a given status (test and admin helper).
    pub async fn count_by_status(pool: &PgPool, status_id: StatusId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM review_jobs WHERE status_id = $1")
            .bind(status_id)
            .fetch_one(pool)
            .await
    }
}
