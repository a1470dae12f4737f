//! Completion notification delivery.
//!
//! [`WebhookDispatcher`] fans out `review.completed` events to the job's
//! own webhook URL (if set) and to every active, filter-matching endpoint
//! registered by the job's owner. Delivery is strictly best-effort: one
//! attempt per endpoint, failures are counted and logged, and nothing
//! ever propagates back to the caller of `complete_review`.

pub mod webhook;

pub use webhook::{ReviewCompletedEvent, WebhookDispatcher, WebhookError};
