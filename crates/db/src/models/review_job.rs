//! Review job entity and DTOs.

use qbee_core::review::TargetType;
use qbee_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `review_jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewJob {
    pub id: DbId,
    pub target_type: String,
    pub target_id: String,
    pub review_type: String,
    /// 1 = highest .. 10 = lowest.
    pub priority: i32,
    pub status_id: StatusId,
    pub result_code: Option<String>,
    pub result_message: Option<String>,
    /// 0–100, set on completion when the pipeline produced a score.
    pub confidence_score: Option<i16>,
    pub worker_id: Option<String>,
    /// User that requested the review; drives webhook fan-out.
    pub requested_by: Option<DbId>,
    /// Per-job delivery override supplied by the producer.
    pub webhook_url: Option<String>,
    /// Provenance link when this job is an explicit re-queue.
    pub retry_of_job_id: Option<DbId>,
    pub created_at: Timestamp,
    /// Doubles as the lease stamp for crashed-worker recovery.
    pub claimed_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

impl ReviewJob {
    /// Parse the stored target type string back into its enum.
    pub fn target_type(&self) -> Result<TargetType, qbee_core::error::CoreError> {
        TargetType::parse(&self.target_type)
    }
}

/// DTO for enqueuing a review via `POST /api/v1/reviews`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueReview {
    pub target_type: String,
    pub target_id: String,
    pub review_type: String,
    /// Defaults to 5 when omitted.
    pub priority: Option<i32>,
    pub requested_by: Option<DbId>,
    pub webhook_url: Option<String>,
}

/// Query parameters for `GET /api/v1/reviews`.
#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    /// Filter by status ID (e.g. 1 = pending, 4 = failed).
    pub status_id: Option<StatusId>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Pending/reviewing counts for the admin queue-depth endpoint.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct QueueDepth {
    pub pending: i64,
    pub reviewing: i64,
}
