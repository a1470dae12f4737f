pub mod health;
pub mod reviews;
pub mod webhooks;
pub mod worker;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /reviews                         enqueue (POST), list (GET)
/// /reviews/queue/depth             pending / in-flight counts
/// /reviews/history                 audit trail
/// /reviews/{id}                    job detail
/// /reviews/{id}/retry              administrative re-queue (POST)
///
/// /webhooks                        list (GET), register (POST)
/// /webhooks/{id}                   update (PATCH), remove (DELETE)
///
/// /worker/next-review              atomic claim (GET)
/// /worker/reviews/{id}/content     content resolution (GET)
/// /worker/reviews/{id}/complete    report result (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/reviews", reviews::router())
        .nest("/webhooks", webhooks::router())
        .nest("/worker", worker::router())
}
