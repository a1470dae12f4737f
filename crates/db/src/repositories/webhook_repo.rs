//! Repository for the `webhook_configs` table.
//!
//! Configs are owned by their registering user; only the delivery
//! counters are mutated by the dispatcher.

use sqlx::PgPool;

use qbee_core::types::DbId;

use crate::models::webhook::{CreateWebhookConfig, UpdateWebhookConfig, WebhookConfig};

/// Column list for `webhook_configs` queries.
const COLUMNS: &str = "\
    id, user_id, url, is_active, target_types, result_codes, \
    total_sent, total_failed, created_at, updated_at";

/// Provides CRUD and counter operations for webhook endpoints.
pub struct WebhookRepo;

impl WebhookRepo {
    /// Register a new endpoint. The per-user cap is enforced by the
    /// caller (via [`Self::count_for_user`]) before inserting.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWebhookConfig,
    ) -> Result<WebhookConfig, sqlx::Error> {
        let query = format!(
            "INSERT INTO webhook_configs \
                 (user_id, url, is_active, target_types, result_codes) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WebhookConfig>(&query)
            .bind(input.user_id)
            .bind(&input.url)
            .bind(input.is_active.unwrap_or(true))
            .bind(&input.target_types)
            .bind(&input.result_codes)
            .fetch_one(pool)
            .await
    }

    /// Count endpoints registered by a user.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM webhook_configs WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// List a user's endpoints, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<WebhookConfig>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM webhook_configs \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, WebhookConfig>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List a user's active endpoints -- the dispatcher's fan-out set.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<WebhookConfig>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM webhook_configs \
             WHERE user_id = $1 AND is_active ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, WebhookConfig>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find an endpoint by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WebhookConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM webhook_configs WHERE id = $1");
        sqlx::query_as::<_, WebhookConfig>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update an endpoint's settings.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWebhookConfig,
    ) -> Result<Option<WebhookConfig>, sqlx::Error> {
        let query = format!(
            "UPDATE webhook_configs SET \
                 url = COALESCE($2, url), \
                 is_active = COALESCE($3, is_active), \
                 target_types = COALESCE($4, target_types), \
                 result_codes = COALESCE($5, result_codes), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WebhookConfig>(&query)
            .bind(id)
            .bind(&input.url)
            .bind(input.is_active)
            .bind(&input.target_types)
            .bind(&input.result_codes)
            .fetch_optional(pool)
            .await
    }

    /// Delete an endpoint by ID.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM webhook_configs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a successful delivery.
    pub async fn increment_sent(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE webhook_configs \
             SET total_sent = total_sent + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Record a failed delivery.
    pub async fn increment_failed(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE webhook_configs \
             SET total_failed = total_failed + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
