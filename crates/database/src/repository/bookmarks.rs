use super::DbRepository;
use crate::DbError;
use chrono::Utc;
use core_types::Workout;

impl DbRepository {
    /// Bookmarks a workout for a user.
    ///
    /// Idempotent: bookmarking twice leaves a single row. Returns whether a new
    /// row was written.
    pub async fn add_bookmark(&self, user_id: i64, workout_id: i64) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO bookmarks (user_id, workout_id, created_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (user_id, workout_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(workout_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Removes a bookmark. Removing one that does not exist is a no-op.
    /// Returns whether a row was deleted.
    pub async fn remove_bookmark(&self, user_id: i64, workout_id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = ?1 AND workout_id = ?2")
            .bind(user_id)
            .bind(workout_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn is_bookmarked(&self, user_id: i64, workout_id: i64) -> Result<bool, DbError> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM bookmarks WHERE user_id = ?1 AND workout_id = ?2",
        )
        .bind(user_id)
        .bind(workout_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found.is_some())
    }

    /// The user's whole bookmark set, unpaginated.
    pub async fn bookmarked_workouts(&self, user_id: i64) -> Result<Vec<Workout>, DbError> {
        let workouts = sqlx::query_as::<_, Workout>(
            r#"
            SELECT w.id, w.title, w.description, w.image, w.created_at
            FROM workouts AS w
            JOIN bookmarks AS b ON b.workout_id = w.id
            WHERE b.user_id = ?1
            ORDER BY w.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(workouts)
    }
}
