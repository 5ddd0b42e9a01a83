use super::{contains_pattern, DbRepository, NewExercise};
use crate::DbError;
use chrono::Utc;
use core_types::{Exercise, Page, Paginator};
use std::collections::HashSet;

impl DbRepository {
    /// Inserts an exercise and returns the stored row.
    pub async fn create_exercise(&self, new: &NewExercise) -> Result<Exercise, DbError> {
        let exercise = sqlx::query_as::<_, Exercise>(
            r#"
            INSERT INTO exercises (name, description, image, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, description, image, created_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.image)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::classify)?;

        tracing::debug!(exercise_id = exercise.id, "Exercise created.");
        Ok(exercise)
    }

    /// Fetches one exercise. Unknown identifiers yield `DbError::NotFound`.
    pub async fn get_exercise(&self, id: i64) -> Result<Exercise, DbError> {
        sqlx::query_as::<_, Exercise>(
            "SELECT id, name, description, image, created_at FROM exercises WHERE id = ?1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::classify)
    }

    /// Overwrites the editable columns of an exercise. `created_at` is never touched.
    pub async fn update_exercise(&self, id: i64, changes: &NewExercise) -> Result<Exercise, DbError> {
        sqlx::query_as::<_, Exercise>(
            r#"
            UPDATE exercises SET name = ?1, description = ?2, image = ?3
            WHERE id = ?4
            RETURNING id, name, description, image, created_at
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(&changes.image)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::classify)
    }

    /// Deletes an exercise row. Workouts that referenced it survive; only the
    /// relation rows go (via `ON DELETE CASCADE`).
    pub async fn delete_exercise(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    /// Case-insensitive substring search on the exercise name, one page at a time.
    /// A blank query lists every exercise.
    pub async fn search_exercises(
        &self,
        query: Option<&str>,
        paginator: Paginator,
        raw_page: Option<&str>,
    ) -> Result<Page<Exercise>, DbError> {
        let pattern = contains_pattern(query);

        let total: i64 = sqlx::query_scalar(
            r"SELECT COUNT(*) FROM exercises WHERE ?1 IS NULL OR name LIKE ?1 ESCAPE '\'",
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let window = paginator.locate(raw_page, total as u64);
        let items = sqlx::query_as::<_, Exercise>(
            r"
            SELECT id, name, description, image, created_at FROM exercises
            WHERE ?1 IS NULL OR name LIKE ?1 ESCAPE '\'
            ORDER BY id
            LIMIT ?2 OFFSET ?3
            ",
        )
        .bind(pattern.as_deref())
        .bind(window.limit())
        .bind(window.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(window.into_page(items))
    }

    /// Every exercise, for the workout form's selection list.
    pub async fn all_exercises(&self) -> Result<Vec<Exercise>, DbError> {
        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT id, name, description, image, created_at FROM exercises ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(exercises)
    }

    /// Identifiers of every stored exercise.
    pub async fn existing_exercise_ids(&self) -> Result<HashSet<i64>, DbError> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM exercises")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }
}
