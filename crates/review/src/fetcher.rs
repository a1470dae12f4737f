//! Content fetcher: target-type dispatch to producer read APIs.
//!
//! [`ContentFetcher`] is a registry mapping each [`TargetType`] to the
//! [`ContentSource`] that can resolve its ids. Adding a new producer is
//! one `register` call -- no conditionals anywhere else in the pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use qbee_core::content::{ContentSource, FetchError, ReviewContent};
use qbee_core::review::TargetType;
use qbee_db::DbPool;

/// Dispatches `(target_type, target_id)` lookups to registered sources.
#[derive(Default)]
pub struct ContentFetcher {
    sources: HashMap<TargetType, Arc<dyn ContentSource>>,
}

impl ContentFetcher {
    /// An empty registry. Useful in tests; production code uses
    /// [`Self::with_pg_sources`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with one Postgres-backed source per known target type.
    pub fn with_pg_sources(pool: DbPool) -> Self {
        let mut fetcher = Self::new();
        for target_type in TargetType::ALL {
            fetcher.register(
                target_type,
                Arc::new(PgProducerSource::new(pool.clone(), target_type)),
            );
        }
        fetcher
    }

    /// Register (or replace) the source for a target type.
    pub fn register(&mut self, target_type: TargetType, source: Arc<dyn ContentSource>) {
        self.sources.insert(target_type, source);
    }

    /// Resolve a target into reviewable content.
    pub async fn fetch(
        &self,
        target_type: TargetType,
        target_id: &str,
    ) -> Result<ReviewContent, FetchError> {
        let source = self
            .sources
            .get(&target_type)
            .ok_or(FetchError::Unregistered(target_type.as_str()))?;
        source.fetch(target_id).await
    }
}

// ---------------------------------------------------------------------------
// Postgres-backed sources
// ---------------------------------------------------------------------------

/// Read-only access to one producer's content table.
///
/// Each query is a narrow SELECT of the content body plus (where the
/// producer declares them) the expected section headings. Never mutates
/// producer state.
pub struct PgProducerSource {
    pool: DbPool,
    target_type: TargetType,
}

impl PgProducerSource {
    pub fn new(pool: DbPool, target_type: TargetType) -> Self {
        Self { pool, target_type }
    }

    fn query(&self) -> &'static str {
        match self.target_type {
            TargetType::Report => {
                "SELECT content, expected_sections FROM reports WHERE id = $1"
            }
            TargetType::Message => {
                "SELECT content, NULL::jsonb AS expected_sections FROM messages WHERE id = $1"
            }
            TargetType::Document => {
                "SELECT content, expected_sections FROM documents WHERE id = $1"
            }
            TargetType::PiiDetection => {
                "SELECT content, NULL::jsonb AS expected_sections FROM pii_detections WHERE id = $1"
            }
        }
    }
}

#[async_trait]
impl ContentSource for PgProducerSource {
    async fn fetch(&self, target_id: &str) -> Result<ReviewContent, FetchError> {
        let row: Option<(String, Option<serde_json::Value>)> = sqlx::query_as(self.query())
            .bind(target_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| FetchError::Unavailable {
                target_type: self.target_type,
                reason: e.to_string(),
            })?;

        let (body, sections) = row.ok_or_else(|| FetchError::NotFound {
            target_type: self.target_type,
            target_id: target_id.to_string(),
        })?;

        Ok(ReviewContent {
            target_type: self.target_type,
            target_id: target_id.to_string(),
            body,
            expected_sections: parse_sections(sections),
        })
    }
}

/// A JSONB array of strings, or nothing.
fn parse_sections(value: Option<serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| serde_json::from_value::<Vec<String>>(v).ok())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
