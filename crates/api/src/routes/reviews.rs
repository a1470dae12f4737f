//! Route definitions for the `/reviews` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Routes mounted at `/reviews`.
///
/// ```text
/// POST   /                -> queue_review
/// GET    /                -> list_reviews
/// GET    /queue/depth     -> queue_depth
/// GET    /history         -> list_history
/// GET    /{id}            -> get_review
/// POST   /{id}/retry      -> retry_review
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(reviews::queue_review).get(reviews::list_reviews))
        .route("/queue/depth", get(reviews::queue_depth))
        .route("/history", get(reviews::list_history))
        .route("/{id}", get(reviews::get_review))
        .route("/{id}/retry", post(reviews::retry_review))
}
