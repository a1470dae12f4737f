//! Route definitions for the worker claim/report protocol.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::worker;
use crate::state::AppState;

/// Routes mounted at `/worker`.
///
/// ```text
/// GET    /next-review              -> next_review
/// GET    /reviews/{id}/content     -> review_content
/// POST   /reviews/{id}/complete    -> complete_review
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/next-review", get(worker::next_review))
        .route("/reviews/{id}/content", get(worker::review_content))
        .route("/reviews/{id}/complete", post(worker::complete_review))
}
