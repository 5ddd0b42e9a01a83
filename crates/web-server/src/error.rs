use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures that end a request with an error response.
///
/// Validation problems are not errors: they re-render the form. An
/// unauthenticated request to a gated route is not an error either: the login
/// guard redirects it.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
    #[error("Configuration error: {0}")]
    Config(#[from] configuration::error::ConfigError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::Storage(storage_err) => {
                tracing::error!(error = ?storage_err, "Storage error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while handling a stored file".to_string(),
                )
            }
            AppError::Config(config_err) => {
                tracing::error!(error = ?config_err, "Configuration error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A server configuration error occurred".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "Internal error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

/// Maps a missing row to a 404 for lookups that are expected to miss.
pub(crate) fn not_found(what: &str, id: i64) -> impl FnOnce(database::DbError) -> AppError + '_ {
    move |err| match err {
        database::DbError::NotFound => AppError::NotFound(format!("{what} {id} not found")),
        other => AppError::Database(other),
    }
}
