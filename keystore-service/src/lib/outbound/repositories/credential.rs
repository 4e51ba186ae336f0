use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::credential::errors::RepositoryError;
use crate::domain::credential::models::RefreshTokenRecord;
use crate::domain::credential::models::User;
use crate::domain::credential::models::UserId;
use crate::domain::credential::models::Username;
use crate::domain::credential::ports::CredentialRepository;

pub struct PostgresCredentialRepository {
    pool: PgPool,
}

impl PostgresCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username)
            .map_err(|e| RepositoryError::Database(format!("stored username of user {}: {}", row.id, e)))?;

        Ok(User {
            id: UserId(row.id),
            username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    user_id: i64,
    refresh_token_hash: String,
    refresh_token_expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

impl From<RefreshTokenRow> for RefreshTokenRecord {
    fn from(row: RefreshTokenRow) -> Self {
        Self {
            user_id: UserId(row.user_id),
            refresh_token_hash: row.refresh_token_hash,
            refresh_token_expires_at: row.refresh_token_expires_at,
            revoked_at: row.revoked_at,
        }
    }
}

fn database_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

#[async_trait]
impl CredentialRepository for PostgresCredentialRepository {
    async fn create_user(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return RepositoryError::UniqueViolation(
                        db_err.constraint().unwrap_or("users_username_key").to_string(),
                    );
                }
            }
            database_error(e)
        })?;

        User::try_from(row)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(User::try_from).transpose()
    }

    async fn find_refresh_token(
        &self,
        user_id: UserId,
    ) -> Result<Option<RefreshTokenRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT user_id, refresh_token_hash, refresh_token_expires_at, revoked_at
            FROM user_tokens
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(row.map(RefreshTokenRecord::from))
    }

    async fn save_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO user_tokens (user_id, refresh_token_hash, refresh_token_expires_at, revoked_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET refresh_token_hash = EXCLUDED.refresh_token_hash,
                refresh_token_expires_at = EXCLUDED.refresh_token_expires_at,
                revoked_at = EXCLUDED.revoked_at
            "#,
        )
        .bind(record.user_id.0)
        .bind(&record.refresh_token_hash)
        .bind(record.refresh_token_expires_at)
        .bind(record.revoked_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn replace_refresh_token(
        &self,
        expected_hash: &str,
        record: &RefreshTokenRecord,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE user_tokens
            SET refresh_token_hash = $3, refresh_token_expires_at = $4
            WHERE user_id = $1 AND refresh_token_hash = $2 AND revoked_at IS NULL
            "#,
        )
        .bind(record.user_id.0)
        .bind(expected_hash)
        .bind(&record.refresh_token_hash)
        .bind(record.refresh_token_expires_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() == 1)
    }
}
