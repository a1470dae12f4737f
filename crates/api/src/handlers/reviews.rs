//! Handlers for the `/reviews` resource: enqueue plus the thin
//! admin/user surface over the job store and history.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use qbee_core::error::CoreError;
use qbee_core::types::DbId;
use qbee_db::models::review_history::HistoryListQuery;
use qbee_db::models::review_job::{QueueReview, ReviewListQuery};
use qbee_db::repositories::{ReviewHistoryRepo, ReviewJobRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for a successful enqueue: the job id is the producer's
/// opaque handle.
#[derive(Debug, Serialize)]
pub struct QueuedReview {
    pub job_id: DbId,
}

/// POST /api/v1/reviews
///
/// Enqueue a review job. Returns 201 with the job id. The insert is
/// synchronous; processing is asynchronous -- the producer is never
/// blocked on the review.
pub async fn queue_review(
    State(state): State<AppState>,
    Json(input): Json<QueueReview>,
) -> AppResult<impl IntoResponse> {
    let job = state.service.queue_review(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: QueuedReview { job_id: job.id },
        }),
    ))
}

/// GET /api/v1/reviews
///
/// List jobs, newest first. Supports optional `status_id`, `limit`, and
/// `offset` query parameters.
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ReviewListQuery>,
) -> AppResult<impl IntoResponse> {
    let jobs = ReviewJobRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/reviews/queue/depth
///
/// Pending and in-flight counts for dashboards.
pub async fn queue_depth(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let depth = ReviewJobRepo::queue_depth(&state.pool).await?;
    Ok(Json(DataResponse { data: depth }))
}

/// GET /api/v1/reviews/history
///
/// List audit records, newest first. Supports optional `queue_id`,
/// `limit`, and `offset` query parameters.
pub async fn list_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryListQuery>,
) -> AppResult<impl IntoResponse> {
    let records = ReviewHistoryRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/reviews/{id}
///
/// Get a single job by ID.
pub async fn get_review(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = ReviewJobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ReviewJob",
            id: job_id,
        }))?;
    Ok(Json(DataResponse { data: job }))
}

/// POST /api/v1/reviews/{id}/retry
///
/// Administrative re-queue of a failed or errored job. Returns 201 with
/// the fresh pending job; 409 if the original is not retryable.
pub async fn retry_review(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = state.service.retry_review(job_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}
