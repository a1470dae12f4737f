//! Handlers for webhook endpoint registration and management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use qbee_core::error::CoreError;
use qbee_core::types::DbId;
use qbee_db::models::webhook::{CreateWebhookConfig, UpdateWebhookConfig, MAX_WEBHOOKS_PER_USER};
use qbee_db::repositories::WebhookRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WebhookListQuery {
    pub user_id: DbId,
}

/// GET /api/v1/webhooks?user_id=N
///
/// List the endpoints registered by a user, newest first.
pub async fn list_webhooks(
    State(state): State<AppState>,
    Query(params): Query<WebhookListQuery>,
) -> AppResult<impl IntoResponse> {
    let configs = WebhookRepo::list_for_user(&state.pool, params.user_id).await?;
    Ok(Json(DataResponse { data: configs }))
}

/// POST /api/v1/webhooks
///
/// Register an endpoint. Each user may hold at most
/// [`MAX_WEBHOOKS_PER_USER`] configs; exceeding the cap is a 409.
pub async fn create_webhook(
    State(state): State<AppState>,
    Json(input): Json<CreateWebhookConfig>,
) -> AppResult<impl IntoResponse> {
    if input.url.trim().is_empty() {
        return Err(AppError::BadRequest("url must not be empty".to_string()));
    }

    let existing = WebhookRepo::count_for_user(&state.pool, input.user_id).await?;
    if existing >= MAX_WEBHOOKS_PER_USER {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Webhook limit reached ({MAX_WEBHOOKS_PER_USER} per user)"
        ))));
    }

    let config = WebhookRepo::create(&state.pool, &input).await?;
    tracing::info!(
        webhook_id = config.id,
        user_id = config.user_id,
        "Webhook endpoint registered"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: config })))
}

/// PATCH /api/v1/webhooks/{id}
///
/// Update an endpoint's URL, active flag, or filters.
pub async fn update_webhook(
    State(state): State<AppState>,
    Path(webhook_id): Path<DbId>,
    Json(input): Json<UpdateWebhookConfig>,
) -> AppResult<impl IntoResponse> {
    if let Some(url) = &input.url {
        if url.trim().is_empty() {
            return Err(AppError::BadRequest("url must not be empty".to_string()));
        }
    }

    let config = WebhookRepo::update(&state.pool, webhook_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WebhookConfig",
            id: webhook_id,
        }))?;
    Ok(Json(DataResponse { data: config }))
}

/// DELETE /api/v1/webhooks/{id}
///
/// Remove an endpoint. Returns 204 on success.
pub async fn delete_webhook(
    State(state): State<AppState>,
    Path(webhook_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = WebhookRepo::delete(&state.pool, webhook_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "WebhookConfig",
            id: webhook_id,
        }));
    }
    tracing::info!(webhook_id, "Webhook endpoint removed");
    Ok(StatusCode::NO_CONTENT)
}
