use std::sync::Arc;

use qbee_review::ReviewService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: qbee_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Review orchestration service (the sole writer of jobs/history).
    pub service: Arc<ReviewService>,
}
