use super::{contains_pattern, DbRepository, NewWorkout};
use crate::DbError;
use chrono::Utc;
use core_types::{Exercise, Page, Paginator, Workout};
use sqlx::{Sqlite, Transaction};

impl DbRepository {
    /// Inserts a workout together with its exercise set, within a single transaction.
    pub async fn create_workout(
        &self,
        new: &NewWorkout,
        exercise_ids: &[i64],
    ) -> Result<Workout, DbError> {
        let mut tx = self.pool.begin().await?;

        let workout = sqlx::query_as::<_, Workout>(
            r#"
            INSERT INTO workouts (title, description, image, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, title, description, image, created_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.image)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(DbError::classify)?;

        link_exercises(&mut tx, workout.id, exercise_ids).await?;
        tx.commit().await?;

        tracing::debug!(workout_id = workout.id, exercises = exercise_ids.len(), "Workout created.");
        Ok(workout)
    }

    /// Fetches one workout. Unknown identifiers yield `DbError::NotFound`.
    pub async fn get_workout(&self, id: i64) -> Result<Workout, DbError> {
        sqlx::query_as::<_, Workout>(
            "SELECT id, title, description, image, created_at FROM workouts WHERE id = ?1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::classify)
    }

    /// Overwrites a workout's columns and replaces its exercise set, atomically.
    pub async fn update_workout(
        &self,
        id: i64,
        changes: &NewWorkout,
        exercise_ids: &[i64],
    ) -> Result<Workout, DbError> {
        let mut tx = self.pool.begin().await?;

        let workout = sqlx::query_as::<_, Workout>(
            r#"
            UPDATE workouts SET title = ?1, description = ?2, image = ?3
            WHERE id = ?4
            RETURNING id, title, description, image, created_at
            "#,
        )
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.image)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(DbError::classify)?;

        sqlx::query("DELETE FROM workout_exercises WHERE workout_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        link_exercises(&mut tx, id, exercise_ids).await?;

        tx.commit().await?;
        Ok(workout)
    }

    /// Deletes a workout row. Relation rows and bookmarks go with it (`ON DELETE CASCADE`).
    pub async fn delete_workout(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    /// Case-insensitive substring search on the workout title, one page at a time.
    /// A blank query lists every workout.
    pub async fn search_workouts(
        &self,
        query: Option<&str>,
        paginator: Paginator,
        raw_page: Option<&str>,
    ) -> Result<Page<Workout>, DbError> {
        let pattern = contains_pattern(query);

        let total: i64 = sqlx::query_scalar(
            r"SELECT COUNT(*) FROM workouts WHERE ?1 IS NULL OR title LIKE ?1 ESCAPE '\'",
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let window = paginator.locate(raw_page, total as u64);
        let items = sqlx::query_as::<_, Workout>(
            r"
            SELECT id, title, description, image, created_at FROM workouts
            WHERE ?1 IS NULL OR title LIKE ?1 ESCAPE '\'
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

    /// One page of the exercises that belong to a workout.
    pub async fn workout_exercises(
        &self,
        workout_id: i64,
        paginator: Paginator,
        raw_page: Option<&str>,
    ) -> Result<Page<Exercise>, DbError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM workout_exercises WHERE workout_id = ?1")
                .bind(workout_id)
                .fetch_one(&self.pool)
                .await?;

        let window = paginator.locate(raw_page, total as u64);
        let items = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT e.id, e.name, e.description, e.image, e.created_at
            FROM exercises AS e
            JOIN workout_exercises AS we ON we.exercise_id = e.id
            WHERE we.workout_id = ?1
            ORDER BY e.id
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(workout_id)
        .bind(window.limit())
        .bind(window.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(window.into_page(items))
    }

    /// Identifiers of the exercises in a workout, ascending. Pre-selects the edit form.
    pub async fn workout_exercise_ids(&self, workout_id: i64) -> Result<Vec<i64>, DbError> {
        let ids = sqlx::query_scalar(
            "SELECT exercise_id FROM workout_exercises WHERE workout_id = ?1 ORDER BY exercise_id",
        )
        .bind(workout_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}

async fn link_exercises(
    tx: &mut Transaction<'_, Sqlite>,
    workout_id: i64,
    exercise_ids: &[i64],
) -> Result<(), DbError> {
    for exercise_id in exercise_ids {
        sqlx::query(
            "INSERT INTO workout_exercises (workout_id, exercise_id) VALUES (?1, ?2) ON CONFLICT DO NOTHING",
        )
        .bind(workout_id)
        .bind(exercise_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
