//! Integration tests for the review job queue.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Claims respect priority order, FIFO within a priority
//! - Concurrent claims never hand the same job to two workers
//! - `mark_completed` is guarded on the `reviewing` status and the
//!   claiming worker's identity
//! - Expired leases are released back to `pending`
//! - Re-queueing records provenance on the fresh job

use sqlx::PgPool;

use qbee_core::review::CODE_PASSED;
use qbee_db::models::review_job::{QueueReview, ReviewListQuery};
use qbee_db::models::status::ReviewStatus;
use qbee_db::repositories::ReviewJobRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_job(target_id: &str, priority: Option<i32>) -> QueueReview {
    QueueReview {
        target_type: "report".to_string(),
        target_id: target_id.to_string(),
        review_type: "output_validation".to_string(),
        priority,
        requested_by: None,
        webhook_url: None,
    }
}

/// Backdate a claim so the lease sweep sees it as expired.
async fn backdate_claim(pool: &PgPool, job_id: i64, secs: i64) {
    sqlx::query("UPDATE review_jobs SET claimed_at = NOW() - ($2 * INTERVAL '1 second') WHERE id = $1")
        .bind(job_id)
        .bind(secs)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Test: insert defaults
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_defaults_to_pending_priority_5(pool: PgPool) {
    let job = ReviewJobRepo::insert(&pool, &new_job("R1", None))
        .await
        .unwrap();

    assert_eq!(job.status_id, ReviewStatus::Pending.id());
    assert_eq!(job.priority, 5);
    assert!(job.worker_id.is_none());
    assert!(job.claimed_at.is_none());
    assert!(job.completed_at.is_none());
    assert!(job.result_code.is_none());
}

// ---------------------------------------------------------------------------
// Test: claim order
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_claim_respects_priority_order(pool: PgPool) {
    ReviewJobRepo::insert(&pool, &new_job("low", Some(5)))
        .await
        .unwrap();
    ReviewJobRepo::insert(&pool, &new_job("urgent", Some(1)))
        .await
        .unwrap();
    ReviewJobRepo::insert(&pool, &new_job("mid", Some(3)))
        .await
        .unwrap();

    let first = ReviewJobRepo::claim_next(&pool, "w1").await.unwrap().unwrap();
    let second = ReviewJobRepo::claim_next(&pool, "w1").await.unwrap().unwrap();
    let third = ReviewJobRepo::claim_next(&pool, "w1").await.unwrap().unwrap();

    assert_eq!(first.target_id, "urgent");
    assert_eq!(second.target_id, "mid");
    assert_eq!(third.target_id, "low");

    let empty = ReviewJobRepo::claim_next(&pool, "w1").await.unwrap();
    assert!(empty.is_none(), "drained queue should yield no claim");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_claim_is_fifo_within_priority(pool: PgPool) {
    let older = ReviewJobRepo::insert(&pool, &new_job("older", Some(5)))
        .await
        .unwrap();
    let newer = ReviewJobRepo::insert(&pool, &new_job("newer", Some(5)))
        .await
        .unwrap();
    assert!(older.created_at <= newer.created_at);

    let first = ReviewJobRepo::claim_next(&pool, "w1").await.unwrap().unwrap();
    assert_eq!(first.id, older.id, "equal priority should be FIFO");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_claim_stamps_worker_and_lease(pool: PgPool) {
    ReviewJobRepo::insert(&pool, &new_job("R1", None))
        .await
        .unwrap();

    let claimed = ReviewJobRepo::claim_next(&pool, "worker-abc")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(claimed.status_id, ReviewStatus::Reviewing.id());
    assert_eq!(claimed.worker_id.as_deref(), Some("worker-abc"));
    assert!(claimed.claimed_at.is_some(), "claim must stamp the lease");
}

// ---------------------------------------------------------------------------
// Test: concurrent claims get disjoint jobs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_claims_single_job_one_winner(pool: PgPool) {
    ReviewJobRepo::insert(&pool, &new_job("contested", Some(1)))
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        ReviewJobRepo::claim_next(&pool, "w1"),
        ReviewJobRepo::claim_next(&pool, "w2"),
    );
    let a = a.unwrap();
    let b = b.unwrap();

    assert!(
        a.is_some() != b.is_some(),
        "exactly one of two racing workers should win the only job"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_claims_are_disjoint(pool: PgPool) {
    for i in 0..8 {
        ReviewJobRepo::insert(&pool, &new_job(&format!("job-{i}"), Some(5)))
            .await
            .unwrap();
    }

    let workers: Vec<String> = (0..8).map(|i| format!("w{i}")).collect();
    let claims = futures::future::try_join_all(
        workers.iter().map(|worker| ReviewJobRepo::claim_next(&pool, worker)),
    )
    .await
    .unwrap();

    let mut ids: Vec<i64> = claims.into_iter().flatten().map(|job| job.id).collect();
    assert_eq!(ids.len(), 8, "every worker should claim some job");
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 8, "no job may be claimed twice");
}

// ---------------------------------------------------------------------------
// Test: guarded completion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_completed_requires_reviewing(pool: PgPool) {
    let pending = ReviewJobRepo::insert(&pool, &new_job("R1", None))
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();

    // Not claimed yet: completion must be a no-op.
    let updated = ReviewJobRepo::mark_completed(
        &mut conn,
        pending.id,
        "w1",
        ReviewStatus::Passed,
        CODE_PASSED,
        "ok",
        Some(85),
    )
    .await
    .unwrap();
    assert!(!updated, "completing a pending job should be rejected");

    let claimed = ReviewJobRepo::claim_next(&pool, "w1").await.unwrap().unwrap();
    let updated = ReviewJobRepo::mark_completed(
        &mut conn,
        claimed.id,
        "w1",
        ReviewStatus::Passed,
        CODE_PASSED,
        "ok",
        Some(85),
    )
    .await
    .unwrap();
    assert!(updated);

    // Already terminal: a second completion must not overwrite the first.
    let updated = ReviewJobRepo::mark_completed(
        &mut conn,
        claimed.id,
        "w1",
        ReviewStatus::Failed,
        "CONTENT_EMPTY",
        "late duplicate",
        None,
    )
    .await
    .unwrap();
    assert!(!updated, "terminal jobs must stay terminal");

    let job = ReviewJobRepo::find_by_id(&pool, claimed.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status_id, ReviewStatus::Passed.id());
    assert_eq!(job.result_code.as_deref(), Some(CODE_PASSED));
    assert_eq!(job.confidence_score, Some(85));
    assert!(job.completed_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stale_worker_cannot_overwrite_reclaimed_job(pool: PgPool) {
    ReviewJobRepo::insert(&pool, &new_job("R1", None)).await.unwrap();

    // First worker claims, then dies; the lease sweep releases the job
    // and a second worker picks it up.
    let stale_claim = ReviewJobRepo::claim_next(&pool, "w1").await.unwrap().unwrap();
    backdate_claim(&pool, stale_claim.id, 600).await;
    assert_eq!(ReviewJobRepo::reclaim_expired(&pool, 300).await.unwrap(), 1);
    let live_claim = ReviewJobRepo::claim_next(&pool, "w2").await.unwrap().unwrap();
    assert_eq!(live_claim.id, stale_claim.id);

    let mut conn = pool.acquire().await.unwrap();

    // The revived first worker reports late: the job is `reviewing`
    // again, but under w2, so w1's result must be discarded.
    let updated = ReviewJobRepo::mark_completed(
        &mut conn,
        stale_claim.id,
        "w1",
        ReviewStatus::Failed,
        "CONTENT_EMPTY",
        "stale result",
        None,
    )
    .await
    .unwrap();
    assert!(!updated, "a reclaimed claim must not accept the old worker's result");

    // The live worker's result is the one recorded.
    let updated = ReviewJobRepo::mark_completed(
        &mut conn,
        live_claim.id,
        "w2",
        ReviewStatus::Passed,
        CODE_PASSED,
        "ok",
        Some(85),
    )
    .await
    .unwrap();
    assert!(updated);

    let job = ReviewJobRepo::find_by_id(&pool, live_claim.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status_id, ReviewStatus::Passed.id());
    assert_eq!(job.result_code.as_deref(), Some(CODE_PASSED));
}

// ---------------------------------------------------------------------------
// Test: lease reclaim
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reclaim_releases_only_expired_leases(pool: PgPool) {
    ReviewJobRepo::insert(&pool, &new_job("stale", Some(5)))
        .await
        .unwrap();
    ReviewJobRepo::insert(&pool, &new_job("fresh", Some(5)))
        .await
        .unwrap();

    let stale = ReviewJobRepo::claim_next(&pool, "dead-worker")
        .await
        .unwrap()
        .unwrap();
    let fresh = ReviewJobRepo::claim_next(&pool, "live-worker")
        .await
        .unwrap()
        .unwrap();

    backdate_claim(&pool, stale.id, 600).await;

    let released = ReviewJobRepo::reclaim_expired(&pool, 300).await.unwrap();
    assert_eq!(released, 1);

    let stale = ReviewJobRepo::find_by_id(&pool, stale.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stale.status_id, ReviewStatus::Pending.id());
    assert!(stale.worker_id.is_none());
    assert!(stale.claimed_at.is_none());

    let fresh = ReviewJobRepo::find_by_id(&pool, fresh.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fresh.status_id, ReviewStatus::Reviewing.id());
    assert_eq!(fresh.worker_id.as_deref(), Some("live-worker"));

    // The released job is claimable again.
    let reclaimed = ReviewJobRepo::claim_next(&pool, "w2").await.unwrap().unwrap();
    assert_eq!(reclaimed.id, stale.id);
}

// ---------------------------------------------------------------------------
// Test: re-queue provenance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_requeue_links_to_original(pool: PgPool) {
    let mut input = new_job("R1", Some(2));
    input.requested_by = Some(7);
    let original = ReviewJobRepo::insert(&pool, &input).await.unwrap();

    let retry = ReviewJobRepo::requeue(&pool, &original).await.unwrap();

    assert_ne!(retry.id, original.id);
    assert_eq!(retry.retry_of_job_id, Some(original.id));
    assert_eq!(retry.status_id, ReviewStatus::Pending.id());
    assert_eq!(retry.priority, 2);
    assert_eq!(retry.requested_by, Some(7));
    assert_eq!(retry.target_id, original.target_id);
}

// ---------------------------------------------------------------------------
// Test: listing and depth
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_queue_depth_counts(pool: PgPool) {
    for i in 0..3 {
        ReviewJobRepo::insert(&pool, &new_job(&format!("p{i}"), None))
            .await
            .unwrap();
    }
    ReviewJobRepo::claim_next(&pool, "w1").await.unwrap();

    let depth = ReviewJobRepo::queue_depth(&pool).await.unwrap();
    assert_eq!(depth.pending, 2);
    assert_eq!(depth.reviewing, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_status(pool: PgPool) {
    ReviewJobRepo::insert(&pool, &new_job("a", None)).await.unwrap();
    ReviewJobRepo::insert(&pool, &new_job("b", None)).await.unwrap();
    ReviewJobRepo::claim_next(&pool, "w1").await.unwrap();

    let pending = ReviewJobRepo::list(
        &pool,
        &ReviewListQuery {
            status_id: Some(ReviewStatus::Pending.id()),
            limit: None,
            offset: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(pending.len(), 1);

    let all = ReviewJobRepo::list(
        &pool,
        &ReviewListQuery {
            status_id: None,
            limit: Some(1),
            offset: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(all.len(), 1, "limit should cap the page size");
}
