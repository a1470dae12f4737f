//! The review service: orchestration of the queue, content resolution,
//! the validator pipeline, and completion notification.
//!
//! [`ReviewService`](service::ReviewService) is the sole writer of review
//! jobs and history. Workers and the API both drive it; nothing else
//! touches those tables.

pub mod fetcher;
pub mod pipeline;
pub mod quality_http;
pub mod service;

pub use fetcher::ContentFetcher;
pub use pipeline::ValidatorPipeline;
pub use quality_http::HttpQualityBackend;
pub use service::{ReviewService, ServiceError};
