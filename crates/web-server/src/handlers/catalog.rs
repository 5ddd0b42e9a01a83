use super::{DetailQuery, ListingQuery, QueryPairs};
use crate::{
    auth::MaybeUser,
    error::{not_found, AppError},
    views::{CatalogView, HomeView, WorkoutDetailView, VIEW_CATALOG, VIEW_HOME, VIEW_WORKOUT_DETAIL},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use core_types::{
    DetailMode, Paginator, EXERCISES_PER_PAGE, WORKOUTS_PER_PAGE, WORKOUT_EXERCISES_PER_PAGE,
};
use std::sync::Arc;

/// # GET /
pub async fn home(MaybeUser(user): MaybeUser) -> Json<HomeView> {
    Json(HomeView {
        view: VIEW_HOME,
        show_navbar: true,
        user,
    })
}

/// # GET /entrenamientos
/// Workouts whose title contains `q`, three per page.
pub async fn workouts(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<CatalogView>, AppError> {
    let query = ListingQuery::from_pairs(&pairs);
    let search = query.search();
    let page = state
        .db_repo
        .search_workouts(
            Some(search),
            Paginator::new(WORKOUTS_PER_PAGE),
            query.page.as_deref(),
        )
        .await?;

    Ok(Json(CatalogView {
        view: VIEW_CATALOG,
        workouts: Some(page),
        exercises: None,
        show_exercises: false,
        query: search.to_string(),
        show_navbar: true,
        user,
    }))
}

/// # GET /ejercicios
/// Same listing view, switched to exercises.
pub async fn exercises(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<CatalogView>, AppError> {
    let query = ListingQuery::from_pairs(&pairs);
    let search = query.search();
    let page = state
        .db_repo
        .search_exercises(
            Some(search),
            Paginator::new(EXERCISES_PER_PAGE),
            query.page.as_deref(),
        )
        .await?;

    Ok(Json(CatalogView {
        view: VIEW_CATALOG,
        workouts: None,
        exercises: Some(page),
        show_exercises: true,
        query: search.to_string(),
        show_navbar: true,
        user,
    }))
}

/// # GET /entrenamiento/:id
pub async fn workout_detail(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i64>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<WorkoutDetailView>, AppError> {
    let query = DetailQuery::from_pairs(&pairs);
    let workout = state
        .db_repo
        .get_workout(id)
        .await
        .map_err(not_found("Workout", id))?;

    let exercises = state
        .db_repo
        .workout_exercises(
            id,
            Paginator::new(WORKOUT_EXERCISES_PER_PAGE),
            query.page.as_deref(),
        )
        .await?;

    let bookmarked = match &user {
        Some(user) => state.db_repo.is_bookmarked(user.id, id).await?,
        None => false,
    };

    Ok(Json(WorkoutDetailView {
        view: VIEW_WORKOUT_DETAIL,
        workout,
        exercises,
        mode: DetailMode::from_query(query.mostrar.as_deref()),
        bookmarked,
        show_navbar: true,
        user,
    }))
}
