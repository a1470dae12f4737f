//! Worker-facing handlers: claim, content resolution, and completion.
//!
//! These mirror what the in-process worker binary does through
//! [`qbee_review::ReviewService`] directly, for deployments that run
//! workers as separate processes speaking HTTP.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use qbee_core::content::FetchError;
use qbee_core::error::CoreError;
use qbee_core::review::ReviewOutcome;
use qbee_core::types::DbId;
use qbee_db::repositories::ReviewJobRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClaimQuery {
    pub worker_id: String,
}

/// GET /api/v1/worker/next-review?worker_id=...
///
/// Atomically claim the next pending job. `data` is `null` when the
/// queue is empty; the worker backs off and polls again.
pub async fn next_review(
    State(state): State<AppState>,
    Query(params): Query<ClaimQuery>,
) -> AppResult<impl IntoResponse> {
    if params.worker_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "worker_id must not be empty".to_string(),
        ));
    }
    let job = state.service.get_next_review(&params.worker_id).await?;
    Ok(Json(DataResponse { data: job }))
}

/// GET /api/v1/worker/reviews/{id}/content
///
/// Resolve a claimed job's target into reviewable content. A failure
/// here is terminal for the job: the worker reports it back as a
/// `CONTENT_FETCH_FAILED` completion.
pub async fn review_content(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = ReviewJobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ReviewJob",
            id: job_id,
        }))?;

    let target_type = job.target_type()?;
    let content = state
        .service
        .get_content_for_review(target_type, &job.target_id)
        .await
        .map_err(|err| match err {
            FetchError::NotFound { .. } => AppError::Core(CoreError::NotFound {
                entity: "ReviewContent",
                id: job_id,
            }),
            err @ (FetchError::Unavailable { .. } | FetchError::Unregistered(_)) => {
                AppError::Core(CoreError::Internal(format!("Content fetch failed: {err}")))
            }
        })?;

    Ok(Json(DataResponse { data: content }))
}

/// Body for `POST /api/v1/worker/reviews/{id}/complete`.
#[derive(Debug, Deserialize)]
pub struct CompleteReview {
    /// Identity of the worker reporting the result; must match the
    /// job's current claim for the completion to be recorded.
    pub worker_id: String,
    #[serde(flatten)]
    pub outcome: ReviewOutcome,
    pub processing_time_ms: i32,
}

#[derive(Debug, Serialize)]
pub struct CompletionReceipt {
    /// `false` means the job was no longer in `reviewing` under the
    /// reporting worker (already completed, or reclaimed and handed to
    /// another worker) and the result was discarded.
    pub recorded: bool,
}

/// POST /api/v1/worker/reviews/{id}/complete
///
/// Record a claimed job's terminal result and trigger notifications.
pub async fn complete_review(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<CompleteReview>,
) -> AppResult<impl IntoResponse> {
    let mut job = ReviewJobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ReviewJob",
            id: job_id,
        }))?;

    // Complete on behalf of the reporting worker: a stale worker whose
    // claim was reclaimed must not be able to overwrite the live one.
    job.worker_id = Some(input.worker_id);

    let recorded = state
        .service
        .complete_review(&job, &input.outcome, input.processing_time_ms)
        .await?;

    Ok(Json(DataResponse {
        data: CompletionReceipt { recorded },
    }))
}
