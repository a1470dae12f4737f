//! Periodic reclaim of jobs stranded in `reviewing`.
//!
//! A worker killed mid-job leaves its claim stuck with no one to finish
//! it. This sweep releases `reviewing` jobs whose lease (`claimed_at`)
//! has expired back to `pending`, making them eligible for re-claim by
//! any live worker. Runs on a fixed interval using `tokio::time::interval`.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use qbee_db::repositories::ReviewJobRepo;

/// How often the reclaim sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Run the lease-reclaim loop until `cancel` is triggered.
pub async fn run(pool: PgPool, lease_secs: i64, cancel: CancellationToken) {
    tracing::info!(
        lease_secs,
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Review lease reclaim sweep started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Review lease reclaim sweep stopping");
                break;
            }
            _ = interval.tick() => {
                match ReviewJobRepo::reclaim_expired(&pool, lease_secs).await {
                    Ok(released) => {
                        if released > 0 {
                            tracing::warn!(released, "Released expired review claims");
                        } else {
                            tracing::debug!("No expired review claims");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Lease reclaim sweep failed");
                    }
                }
            }
        }
    }
}
