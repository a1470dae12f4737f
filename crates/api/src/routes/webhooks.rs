//! Route definitions for the `/webhooks` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// GET    /        -> list_webhooks
/// POST   /        -> create_webhook
/// PATCH  /{id}    -> update_webhook
/// DELETE /{id}    -> delete_webhook
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(webhooks::list_webhooks).post(webhooks::create_webhook),
        )
        .route(
            "/{id}",
            patch(webhooks::update_webhook).delete(webhooks::delete_webhook),
        )
}
