use super::{discard_image, store_image};
use crate::{
    auth::CurrentUser,
    error::AppError,
    forms,
    views::{ExerciseFormView, FormState, VIEW_EXERCISE_CREATE, VIEW_EXERCISE_EDIT},
    AppState,
};
use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use core_types::validation::{validate_exercise, ExerciseFormValues};
use core_types::{Exercise, MediaKind};
use database::NewExercise;
use std::sync::Arc;

const LISTING_PATH: &str = "/ejercicios";

fn form_view(
    view: &'static str,
    form: FormState<ExerciseFormValues>,
    exercise: Option<&Exercise>,
) -> Json<ExerciseFormView> {
    Json(ExerciseFormView {
        view,
        form,
        exercise_id: exercise.map(|e| e.id),
        current_image: exercise.map(|e| e.image.clone()),
        show_navbar: true,
    })
}

/// # GET /ejercicios/crear
pub async fn create_form() -> Json<ExerciseFormView> {
    form_view(
        VIEW_EXERCISE_CREATE,
        FormState::clean(ExerciseFormValues::default()),
        None,
    )
}

/// # POST /ejercicios/crear
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let input = forms::read_exercise(multipart).await?;
    let values = ExerciseFormValues::from(&input);

    let valid = match validate_exercise(input) {
        Ok(valid) => valid,
        Err(errors) => {
            let form = FormState::with_errors(values, errors);
            return Ok(form_view(VIEW_EXERCISE_CREATE, form, None).into_response());
        }
    };

    let image = store_image(&state, MediaKind::Exercise, valid.image.as_ref()).await?;
    let new = NewExercise {
        name: valid.name,
        description: valid.description,
        image: image.clone(),
    };
    match state.db_repo.create_exercise(&new).await {
        Ok(exercise) => {
            tracing::info!(exercise_id = exercise.id, user_id = user.id, "Exercise created.");
            Ok(Redirect::to(LISTING_PATH).into_response())
        }
        Err(e) => {
            discard_image(&state, &image).await;
            Err(e.into())
        }
    }
}

/// # GET /ejercicios/editar/:id
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ExerciseFormView>, AppError> {
    let exercise = state.db_repo.get_exercise(id).await?;
    let values = ExerciseFormValues {
        nombre: exercise.name.clone(),
        descripcion: exercise.description.clone(),
    };
    Ok(form_view(VIEW_EXERCISE_EDIT, FormState::clean(values), Some(&exercise)))
}

/// # POST /ejercicios/editar/:id
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let exercise = state.db_repo.get_exercise(id).await?;
    let input = forms::read_exercise(multipart).await?;
    let values = ExerciseFormValues::from(&input);

    let valid = match validate_exercise(input) {
        Ok(valid) => valid,
        Err(errors) => {
            let form = FormState::with_errors(values, errors);
            return Ok(form_view(VIEW_EXERCISE_EDIT, form, Some(&exercise)).into_response());
        }
    };

    let image = match valid.image.as_ref() {
        Some(upload) => store_image(&state, MediaKind::Exercise, Some(upload)).await?,
        None => exercise.image.clone(),
    };
    let changes = NewExercise {
        name: valid.name,
        description: valid.description,
        image: image.clone(),
    };
    if let Err(e) = state.db_repo.update_exercise(id, &changes).await {
        if image != exercise.image {
            discard_image(&state, &image).await;
        }
        return Err(e.into());
    }

    if image != exercise.image {
        discard_image(&state, &exercise.image).await;
    }
    tracing::info!(exercise_id = id, user_id = user.id, "Exercise updated.");
    Ok(Redirect::to(LISTING_PATH).into_response())
}

/// # POST /ejercicios/eliminar/:id
///
/// Removes the image, then the row. Workouts that listed the exercise keep
/// existing without it.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    let exercise = state.db_repo.get_exercise(id).await?;
    discard_image(&state, &exercise.image).await;
    state.db_repo.delete_exercise(id).await?;
    tracing::info!(exercise_id = id, user_id = user.id, "Exercise deleted.");
    Ok(Redirect::to(LISTING_PATH))
}
