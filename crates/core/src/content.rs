//! Content resolution seam between the review core and the producer
//! subsystems.
//!
//! A [`ContentSource`] is the narrow, read-only interface one producer
//! (reports, messages, documents, PII detections) exposes to the review
//! pipeline. Sources must never mutate producer state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::review::TargetType;

/// The literal content of an artifact plus the minimal metadata the
/// format check needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewContent {
    pub target_type: TargetType,
    pub target_id: String,
    pub body: String,
    /// Section headings the artifact is expected to contain. Empty when
    /// the producer declares no structural expectations.
    pub expected_sections: Vec<String>,
}

/// Why a `(target_type, target_id)` could not be resolved to content.
///
/// Either way the job terminates as `error` with a fetch-failure code;
/// fetch failures are never retried by the worker.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{target_type:?} target '{target_id}' not found")]
    NotFound {
        target_type: TargetType,
        target_id: String,
    },

    #[error("Producer for {target_type:?} unavailable: {reason}")]
    Unavailable {
        target_type: TargetType,
        reason: String,
    },

    #[error("No content source registered for target type '{0}'")]
    Unregistered(&'static str),
}

/// Read-only content access for one producer subsystem.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Resolve an opaque target id into reviewable content.
    async fn fetch(&self, target_id: &str) -> Result<ReviewContent, FetchError>;
}
