use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::errors::AuthError;
use crate::account::models::ActivationLink;
use crate::account::models::EmailAddress;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::ports::UserRepository;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row shape of the `users` table.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    is_activated: bool,
    activation_link: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AuthError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            is_activated: row.is_activated,
            activation_link: ActivationLink::from_string(row.activation_link),
            created_at: row.created_at,
        })
    }
}

const SELECT_USER: &str = r#"
    SELECT id, email, password_hash, is_activated, activation_link, created_at
    FROM users
"#;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, is_activated, activation_link, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.is_activated)
        .bind(user.activation_link.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                    return AuthError::EmailInUse(user.email.as_str().to_string());
                }
            }
            AuthError::Database(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_USER))
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AuthError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{} WHERE email = $1", SELECT_USER))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AuthError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_activation_link(&self, link: &str) -> Result<Option<User>, AuthError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{} WHERE activation_link = $1", SELECT_USER))
                .bind(link)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AuthError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn update(&self, user: User) -> Result<User, AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, password_hash = $3, is_activated = $4
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.is_activated)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound(user.id.to_string()));
        }

        Ok(user)
    }

    async fn list_all(&self) -> Result<Vec<User>, AuthError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("{} ORDER BY created_at DESC", SELECT_USER))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AuthError::Database(e.to_string()))?;

        rows.into_iter().map(User::try_from).collect()
    }
}
