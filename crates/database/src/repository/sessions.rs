use super::DbRepository;
use crate::DbError;
use chrono::{DateTime, Utc};
use core_types::User;

impl DbRepository {
    /// Records a sign-in session for `user_id`, valid until `expires_at`.
    pub async fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(token)
        .bind(user_id)
        .bind(Utc::now())
        .bind(expires_at.timestamp())
        .execute(&self.pool)
        .await
        .map_err(DbError::classify)?;
        Ok(())
    }

    /// Resolves a session token to its user. Expired sessions resolve to `None`.
    pub async fn find_session_user(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.first_name, u.last_name, u.password_hash, u.created_at
            FROM sessions AS s
            JOIN users AS u ON u.id = s.user_id
            WHERE s.token = ?1 AND s.expires_at > ?2
            "#,
        )
        .bind(token)
        .bind(now.timestamp())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Ends a session. Unknown tokens are ignored.
    pub async fn delete_session(&self, token: &str) -> Result<(), DbError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Drops every session that expired before `now`. Returns how many were removed.
    pub async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?1")
            .bind(now.timestamp())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            tracing::debug!(removed = result.rows_affected(), "Expired sessions purged.");
        }
        Ok(result.rows_affected())
    }
}
