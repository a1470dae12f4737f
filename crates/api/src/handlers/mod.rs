//! HTTP request handlers.

pub mod reviews;
pub mod webhooks;
pub mod worker;
