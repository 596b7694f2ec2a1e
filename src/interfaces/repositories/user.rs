use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::borrow::Cow;

use crate::{
    entities::user::{User, UserInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxUserRepo,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn count_users(&self) -> Result<i64, AppError>;
    async fn get_user_by_id(&self, id: i32) -> Result<Option<User>, AppError>;
    /// Matches either the username or the email address.
    async fn get_user_by_identifier(&self, identifier: &str) -> Result<Option<User>, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn create_user(&self, user: &UserInsert) -> Result<User, AppError>;
    /// Inserts only while the table is empty; `None` once any user exists.
    async fn create_first_user(&self, user: &UserInsert) -> Result<Option<User>, AppError>;
    async fn set_reset_token(&self, user_id: i32, token: &str, expires: DateTime<Utc>) -> Result<(), AppError>;
    /// Consumes an unexpired token; `false` when none matched.
    async fn reset_password_with_token(&self, token: &str, password_hash: &str) -> Result<bool, AppError>;
    async fn delete_user_by_username(&self, username: &str) -> Result<bool, AppError>;
}

impl SqlxUserRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxUserRepo { pool }
    }
}

fn map_user_conflict(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
            AppError::Conflict("User already exists".to_string())
        }
        _ => AppError::from(e),
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn get_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_user_by_identifier(&self, identifier: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE username = $1 OR email = LOWER($1) LIMIT 1"
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn create_user(&self, user: &UserInsert) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_conflict)
    }

    async fn create_first_user(&self, user: &UserInsert) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            SELECT $1, $2, $3, $4
            WHERE NOT EXISTS (SELECT 1 FROM users)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_conflict)
    }

    async fn set_reset_token(&self, user_id: i32, token: &str, expires: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_password_token = $2,
                reset_password_expires = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expires)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn reset_password_with_token(&self, token: &str, password_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2,
                reset_password_token = NULL,
                reset_password_expires = NULL,
                updated_at = NOW()
            WHERE reset_password_token = $1
              AND reset_password_expires > NOW()
            "#,
        )
        .bind(token)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user_by_username(&self, username: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
