//! Review history entity: the immutable audit record.

use qbee_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the append-only `review_history` table.
///
/// Exactly one row is written per completed job, inside the same
/// transaction that records the job's terminal status. Rows are never
/// mutated and may outlive an administratively re-queued job.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewHistory {
    pub id: DbId,
    pub queue_id: DbId,
    pub target_type: String,
    pub target_id: String,
    pub result_code: String,
    /// Set when a generative quality check contributed to the result.
    pub model_used: Option<String>,
    pub processing_time_ms: i32,
    pub created_at: Timestamp,
}

/// Query parameters for `GET /api/v1/reviews/history`.
#[derive(Debug, Deserialize)]
pub struct HistoryListQuery {
    /// Filter by originating job.
    pub queue_id: Option<DbId>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
