use super::{discard_image, store_image};
use crate::{
    auth::CurrentUser,
    error::AppError,
    forms,
    views::{FormState, WorkoutFormView, VIEW_WORKOUT_CREATE, VIEW_WORKOUT_EDIT},
    AppState,
};
use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use core_types::validation::{validate_workout, WorkoutFormValues};
use core_types::{MediaKind, Workout};
use database::NewWorkout;
use std::sync::Arc;

const LISTING_PATH: &str = "/entrenamientos";

async fn form_view(
    state: &AppState,
    view: &'static str,
    form: FormState<WorkoutFormValues>,
    workout: Option<&Workout>,
) -> Result<Json<WorkoutFormView>, AppError> {
    let exercises = state.db_repo.all_exercises().await?;
    Ok(Json(WorkoutFormView {
        view,
        form,
        exercises,
        workout_id: workout.map(|w| w.id),
        current_image: workout.map(|w| w.image.clone()),
        show_navbar: true,
    }))
}

/// # GET /entrenamientos/crear
pub async fn create_form(State(state): State<Arc<AppState>>) -> Result<Json<WorkoutFormView>, AppError> {
    form_view(&state, VIEW_WORKOUT_CREATE, FormState::clean(WorkoutFormValues::default()), None).await
}

/// # POST /entrenamientos/crear
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let input = forms::read_workout(multipart).await?;
    let values = WorkoutFormValues::from(&input);
    let known = state.db_repo.existing_exercise_ids().await?;

    let valid = match validate_workout(input, &known) {
        Ok(valid) => valid,
        Err(errors) => {
            let form = FormState::with_errors(values, errors);
            return Ok(form_view(&state, VIEW_WORKOUT_CREATE, form, None).await?.into_response());
        }
    };

    let image = store_image(&state, MediaKind::Workout, valid.image.as_ref()).await?;
    let new = NewWorkout {
        title: valid.title,
        description: valid.description,
        image: image.clone(),
    };
    match state.db_repo.create_workout(&new, &valid.exercise_ids).await {
        Ok(workout) => {
            tracing::info!(workout_id = workout.id, user_id = user.id, "Workout created.");
            Ok(Redirect::to(LISTING_PATH).into_response())
        }
        Err(e) => {
            discard_image(&state, &image).await;
            Err(e.into())
        }
    }
}

/// # GET /entrenamientos/editar/:id
/// The form pre-populated from the stored workout.
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<WorkoutFormView>, AppError> {
    let workout = state.db_repo.get_workout(id).await?;
    let selected = state.db_repo.workout_exercise_ids(id).await?;
    let values = WorkoutFormValues {
        titulo: workout.title.clone(),
        descripcion: workout.description.clone(),
        ejercicios: selected.iter().map(i64::to_string).collect(),
    };
    form_view(&state, VIEW_WORKOUT_EDIT, FormState::clean(values), Some(&workout)).await
}

/// # POST /entrenamientos/editar/:id
///
/// Without a new upload the current image is kept. A replaced upload is
/// removed only after the row has been updated.
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let workout = state.db_repo.get_workout(id).await?;
    let input = forms::read_workout(multipart).await?;
    let values = WorkoutFormValues::from(&input);
    let known = state.db_repo.existing_exercise_ids().await?;

    let valid = match validate_workout(input, &known) {
        Ok(valid) => valid,
        Err(errors) => {
            let form = FormState::with_errors(values, errors);
            return Ok(form_view(&state, VIEW_WORKOUT_EDIT, form, Some(&workout))
                .await?
                .into_response());
        }
    };

    let image = match valid.image.as_ref() {
        Some(upload) => store_image(&state, MediaKind::Workout, Some(upload)).await?,
        None => workout.image.clone(),
    };
    let changes = NewWorkout {
        title: valid.title,
        description: valid.description,
        image: image.clone(),
    };
    if let Err(e) = state
        .db_repo
        .update_workout(id, &changes, &valid.exercise_ids)
        .await
    {
        if image != workout.image {
            discard_image(&state, &image).await;
        }
        return Err(e.into());
    }

    if image != workout.image {
        discard_image(&state, &workout.image).await;
    }
    tracing::info!(workout_id = id, user_id = user.id, "Workout updated.");
    Ok(Redirect::to(LISTING_PATH).into_response())
}

/// # POST /entrenamientos/eliminar/:id
///
/// The stored image is removed first, best-effort, then the row (its exercise
/// links cascade). The two steps are not atomic: if the row delete fails the
/// workout is left pointing at a missing file.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    let workout = state.db_repo.get_workout(id).await?;
    discard_image(&state, &workout.image).await;
    state.db_repo.delete_workout(id).await?;
    tracing::info!(workout_id = id, user_id = user.id, "Workout deleted.");
    Ok(Redirect::to(LISTING_PATH))
}
