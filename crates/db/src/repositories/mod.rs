//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. The two writes that must share
//! a transaction (terminal status + history insert) instead accept
//! `&mut PgConnection` so the review service can compose them.

pub mod review_history_repo;
pub mod review_job_repo;
pub mod webhook_repo;

pub use review_history_repo::ReviewHistoryRepo;
pub use review_job_repo::ReviewJobRepo;
pub use webhook_repo::WebhookRepo;
