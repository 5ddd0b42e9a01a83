//! Parsing of `multipart/form-data` catalog submissions.

use crate::error::AppError;
use axum::extract::multipart::{Field, Multipart, MultipartError};
use core_types::validation::{
    ExerciseInput, WorkoutInput, FIELD_DESCRIPTION, FIELD_EXERCISES, FIELD_IMAGE, FIELD_NAME,
    FIELD_TITLE,
};
use core_types::ImageUpload;

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(format!("malformed form submission: {err}"))
    }
}

/// Reads a workout form. Unknown fields are ignored.
pub async fn read_workout(mut multipart: Multipart) -> Result<WorkoutInput, AppError> {
    let mut input = WorkoutInput::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FIELD_TITLE => input.title = field.text().await?,
            FIELD_DESCRIPTION => input.description = field.text().await?,
            FIELD_EXERCISES => input.exercise_ids.push(field.text().await?),
            FIELD_IMAGE => input.image = read_upload(field).await?,
            _ => {}
        }
    }
    Ok(input)
}

/// Reads an exercise form. Unknown fields are ignored.
pub async fn read_exercise(mut multipart: Multipart) -> Result<ExerciseInput, AppError> {
    let mut input = ExerciseInput::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FIELD_NAME => input.name = field.text().await?,
            FIELD_DESCRIPTION => input.description = field.text().await?,
            FIELD_IMAGE => input.image = read_upload(field).await?,
            _ => {}
        }
    }
    Ok(input)
}

/// A file input left empty arrives as a part with no file name and no bytes.
async fn read_upload(field: Field<'_>) -> Result<Option<ImageUpload>, AppError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await?;
    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(ImageUpload::new(file_name, content_type, bytes.to_vec())))
}
