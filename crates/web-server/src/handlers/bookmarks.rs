use crate::{
    auth::CurrentUser,
    error::{not_found, AppError},
    views::{BookmarksView, VIEW_BOOKMARKS},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::{header::REFERER, HeaderMap, Uri},
    response::Redirect,
    Extension, Json,
};
use std::sync::Arc;

const BOOKMARKS_PATH: &str = "/entrenamientos/apuntados";

/// # POST /entrenamiento/:id/apuntarse
pub async fn add(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    state
        .db_repo
        .get_workout(id)
        .await
        .map_err(not_found("Workout", id))?;

    if state.db_repo.add_bookmark(user.id, id).await? {
        tracing::info!(user_id = user.id, workout_id = id, "Workout bookmarked.");
    }
    Ok(Redirect::to("/entrenamientos"))
}

/// # POST /entrenamiento/:id/desapuntarse
/// Goes back to the referring page when there is one.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    state
        .db_repo
        .get_workout(id)
        .await
        .map_err(not_found("Workout", id))?;

    if state.db_repo.remove_bookmark(user.id, id).await? {
        tracing::info!(user_id = user.id, workout_id = id, "Bookmark removed.");
    }
    let target = referring_path(&headers).unwrap_or_else(|| BOOKMARKS_PATH.to_string());
    Ok(Redirect::to(&target))
}

/// # GET /entrenamientos/apuntados
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<BookmarksView>, AppError> {
    let workouts = state.db_repo.bookmarked_workouts(user.id).await?;
    Ok(Json(BookmarksView {
        view: VIEW_BOOKMARKS,
        workouts,
        show_navbar: true,
        user,
    }))
}

/// Path and query of the `Referer`, so the redirect never leaves the site.
fn referring_path(headers: &HeaderMap) -> Option<String> {
    let referer = headers.get(REFERER)?.to_str().ok()?;
    let uri: Uri = referer.parse().ok()?;
    uri.path_and_query()
        .map(|pq| pq.as_str())
        // `//host` and `/\host` are read by browsers as another origin.
        .filter(|pq| pq.starts_with('/') && !pq.starts_with("//") && !pq.starts_with("/\\"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_referer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn referer_is_reduced_to_a_local_path() {
        assert_eq!(
            referring_path(&with_referer("http://localhost:8000/entrenamiento/3?mostrar=ejercicios")),
            Some("/entrenamiento/3?mostrar=ejercicios".to_string())
        );
        assert_eq!(
            referring_path(&with_referer("/entrenamientos/apuntados")),
            Some("/entrenamientos/apuntados".to_string())
        );
    }

    #[test]
    fn missing_or_garbage_referer_is_ignored() {
        assert_eq!(referring_path(&HeaderMap::new()), None);
        assert_eq!(referring_path(&with_referer("not a uri")), None);
    }

    #[test]
    fn referer_path_pointing_off_site_is_ignored() {
        assert_eq!(
            referring_path(&with_referer("http://localhost//evil.example/steal")),
            None
        );
        assert_eq!(referring_path(&with_referer("//evil.example/steal")), None);
    }
}
