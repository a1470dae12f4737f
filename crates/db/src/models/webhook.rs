//! Webhook endpoint configuration models and DTOs.

use qbee_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum number of webhook endpoints a single user may register.
pub const MAX_WEBHOOKS_PER_USER: i64 = 5;

/// A row from the `webhook_configs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WebhookConfig {
    pub id: DbId,
    pub user_id: DbId,
    pub url: String,
    pub is_active: bool,
    /// Optional allow-list of target type strings (JSON array).
    pub target_types: Option<serde_json::Value>,
    /// Optional allow-list of result codes (JSON array).
    pub result_codes: Option<serde_json::Value>,
    pub total_sent: i64,
    pub total_failed: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WebhookConfig {
    /// Whether a completed job with this target type and result code
    /// should be delivered to this endpoint.
    ///
    /// An absent (or non-array) allow-list matches everything; an empty
    /// array matches nothing.
    pub fn matches(&self, target_type: &str, result_code: &str) -> bool {
        allow_list_matches(self.target_types.as_ref(), target_type)
            && allow_list_matches(self.result_codes.as_ref(), result_code)
    }
}

fn allow_list_matches(list: Option<&serde_json::Value>, value: &str) -> bool {
    match list.and_then(|v| v.as_array()) {
        Some(items) => items.iter().any(|item| item.as_str() == Some(value)),
        None => true,
    }
}

/// DTO for registering a webhook via `POST /api/v1/webhooks`.
#[derive(Debug, Deserialize)]
pub struct CreateWebhookConfig {
    pub user_id: DbId,
    pub url: String,
    pub is_active: Option<bool>,
    pub target_types: Option<serde_json::Value>,
    pub result_codes: Option<serde_json::Value>,
}

/// DTO for updating a webhook. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateWebhookConfig {
    pub url: Option<String>,
    pub is_active: Option<bool>,
    pub target_types: Option<serde_json::Value>,
    pub result_codes: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config(
        target_types: Option<serde_json::Value>,
        result_codes: Option<serde_json::Value>,
    ) -> WebhookConfig {
        WebhookConfig {
            id: 1,
            user_id: 7,
            url: "https://example.test/hook".into(),
            is_active: true,
            target_types,
            result_codes,
            total_sent: 0,
            total_failed: 0,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn no_filters_match_everything() {
        let cfg = config(None, None);
        assert!(cfg.matches("report", "PASSED"));
        assert!(cfg.matches("message", "PII_LEAK_DETECTED"));
    }

    #[test]
    fn target_type_allow_list() {
        let cfg = config(Some(json!(["report", "document"])), None);
        assert!(cfg.matches("report", "PASSED"));
        assert!(!cfg.matches("message", "PASSED"));
    }

    #[test]
    fn result_code_allow_list() {
        let cfg = config(None, Some(json!(["PII_LEAK_DETECTED"])));
        assert!(cfg.matches("report", "PII_LEAK_DETECTED"));
        assert!(!cfg.matches("report", "PASSED"));
    }

    #[test]
    fn empty_allow_list_matches_nothing() {
        let cfg = config(Some(json!([])), None);
        assert!(!cfg.matches("report", "PASSED"));
    }

    #[test]
    fn both_filters_must_match() {
        let cfg = config(Some(json!(["report"])), Some(json!(["PASSED"])));
        assert!(cfg.matches("report", "PASSED"));
        assert!(!cfg.matches("report", "CONTENT_TRUNCATED"));
        assert!(!cfg.matches("message", "PASSED"));
    }
}
