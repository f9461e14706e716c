use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::errors::AuthError;
use crate::account::models::RefreshTokenRecord;
use crate::account::models::UserId;
use crate::account::ports::RefreshTokenRepository;

/// Postgres-backed refresh-token store.
///
/// `user_id` is the primary key, so the upsert serializes rotation per
/// user: the row is overwritten in place, last writer wins.
pub struct PostgresRefreshTokenRepository {
    pool: PgPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RefreshTokenRow {
    user_id: Uuid,
    token: String,
}

impl From<RefreshTokenRow> for RefreshTokenRecord {
    fn from(row: RefreshTokenRow) -> Self {
        Self {
            user_id: UserId(row.user_id),
            token: row.token,
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn upsert(&self, user_id: &UserId, token: &str) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token, created_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id)
            DO UPDATE SET token = EXCLUDED.token, created_at = now()
            "#,
        )
        .bind(user_id.0)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        Ok(())
    }

    async fn remove(&self, token: &str) -> Result<(), AuthError> {
        // Deleting an absent token is a no-op, not an error.
        sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let row: Option<RefreshTokenRow> =
            sqlx::query_as("SELECT user_id, token FROM refresh_tokens WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AuthError::Database(e.to_string()))?;

        Ok(row.map(RefreshTokenRecord::from))
    }
}
