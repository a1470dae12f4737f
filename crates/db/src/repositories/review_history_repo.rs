//! Repository for the append-only `review_history` table.

use sqlx::{PgConnection, PgPool};

use qbee_core::types::DbId;

use crate::models::review_history::{HistoryListQuery, ReviewHistory};

/// Column list for `review_history` queries.
const COLUMNS: &str = "\
    id, queue_id, target_type, target_id, result_code, model_used, \
    processing_time_ms, created_at";

/// Maximum page size for history listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for history listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides insert and read access to review history. There is no update
/// or delete -- the table is append-only by design.
pub struct ReviewHistoryRepo;

impl ReviewHistoryRepo {
    /// Insert the audit record for a completed job, inside the caller's
    /// transaction (the same one that records the terminal status).
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        conn: &mut PgConnection,
        queue_id: DbId,
        target_type: &str,
        target_id: &str,
        result_code: &str,
        model_used: Option<&str>,
        processing_time_ms: i32,
    ) -> Result<ReviewHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO review_history \
                 (queue_id, target_type, target_id, result_code, model_used, \
                  processing_time_ms) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewHistory>(&query)
            .bind(queue_id)
            .bind(target_type)
            .bind(target_id)
            .bind(result_code)
            .bind(model_used)
            .bind(processing_time_ms)
            .fetch_one(&mut *conn)
            .await
    }

    /// List history records, newest first, optionally filtered by job.
    pub async fn list(
        pool: &PgPool,
        params: &HistoryListQuery,
    ) -> Result<Vec<ReviewHistory>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        match params.queue_id {
            Some(queue_id) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM review_history \
                     WHERE queue_id = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, ReviewHistory>(&query)
                    .bind(queue_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM review_history \
                     ORDER BY created_at DESC LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, ReviewHistory>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Find all history rows for a given target (test and admin helper).
    pub async fn find_by_target(
        pool: &PgPool,
        target_type: &str,
        target_id: &str,
    ) -> Result<Vec<ReviewHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM review_history \
             WHERE target_type = $1 AND target_id = $2 \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, ReviewHistory>(&query)
            .bind(target_type)
            .bind(target_id)
            .fetch_all(pool)
            .await
    }
}
