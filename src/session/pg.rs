// src/session/pg.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::error::AppError;
use crate::session::SessionStore;

/// Session store backed by the 'visitor_sessions' table, one row per
/// (session, key) pair. Eviction of stale sessions is an operational
/// concern (cron on `updated_at`), not handled here.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn get(&self, session_id: &str, key: &str) -> Result<Option<Value>, AppError> {
        let value = sqlx::query_scalar::<_, Value>(
            "SELECT value FROM visitor_sessions WHERE session_id = $1 AND key = $2",
        )
        .bind(session_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read session value {}: {:?}", key, e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(value)
    }

    async fn set(&self, session_id: &str, key: &str, value: Value) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO visitor_sessions (session_id, key, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (session_id, key) DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = NOW()
            "#,
        )
        .bind(session_id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to write session value {}: {:?}", key, e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(())
    }

    async fn delete(&self, session_id: &str, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM visitor_sessions WHERE session_id = $1 AND key = $2")
            .bind(session_id)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete session value {}: {:?}", key, e);
                AppError::InternalServerError(e.to_string())
            })?;

        Ok(())
    }
}
