use super::{DbRepository, NewUser};
use crate::DbError;
use chrono::Utc;
use core_types::User;

const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, password_hash, created_at";

impl DbRepository {
    /// Creates an identity.
    ///
    /// A concurrent registration that already took the username or e-mail
    /// surfaces as `DbError::UniqueViolation`.
    pub async fn create_user(&self, new: &NewUser) -> Result<User, DbError> {
        let sql = format!(
            "INSERT INTO users (username, email, first_name, last_name, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&new.username)
            .bind(&new.email)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(&new.password_hash)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::classify)?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered.");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<User, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::classify)
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, DbError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, DbError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}
