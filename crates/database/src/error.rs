use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A UNIQUE constraint rejected the write (e.g. two registrations racing for one username).
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("The requested data was not found in the database.")]
    NotFound,
}

impl DbError {
    /// Classifies a driver error, surfacing missing rows and uniqueness conflicts.
    pub(crate) fn classify(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::UniqueViolation(db_err.message().to_string())
            }
            other => DbError::QueryError(other),
        }
    }
}
