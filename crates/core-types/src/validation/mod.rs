//! Field-level validation for every form the application accepts.
//!
//! Each validator runs all of its rules in a single pass and returns either the
//! cleaned values or the complete list of `(field, message)` errors, so a form
//! can be re-rendered with every problem at once.

pub mod accounts;
pub mod catalog;

pub use accounts::{
    validate_login, validate_registration, LoginInput, RegistrationFormValues, RegistrationInput,
    UniquenessCheck, ValidLogin, ValidRegistration,
};
pub use catalog::{
    validate_exercise, validate_workout, ExerciseFormValues, ExerciseInput, ValidExercise,
    ValidWorkout, WorkoutFormValues, WorkoutInput, FIELD_DESCRIPTION, FIELD_EXERCISES,
    FIELD_IMAGE, FIELD_NAME, FIELD_TITLE,
};

use crate::structs::ImageUpload;
use serde::Serialize;

pub(crate) const MSG_REQUIRED: &str = "Este campo es obligatorio.";

/// Extensions accepted for uploaded images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// A single validation failure. `field == None` marks a form-level error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Option<String>,
    pub message: String,
}

/// Every failure found while validating one submission, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: Some(field.to_string()),
            message: message.into(),
        });
    }

    /// Records an error that is not attributable to a single field.
    pub fn add_form_error(&mut self, message: impl Into<String>) {
        self.0.push(FieldError {
            field: None,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field.as_deref() == Some(field))
    }

    /// Messages attached to `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |e| e.field.as_deref() == Some(field))
            .map(|e| e.message.as_str())
    }

    /// Messages not tied to any field.
    pub fn form_errors(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|e| e.field.is_none())
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(value)` when nothing was recorded, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Trims `value` and checks it is present and within `max_chars`.
pub(crate) fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    max_chars: Option<usize>,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, MSG_REQUIRED);
        return String::new();
    }
    if let Some(max) = max_chars {
        let len = trimmed.chars().count();
        if len > max {
            errors.add(
                field,
                format!(
                    "Asegúrese de que este valor tenga como máximo {max} caracteres (tiene {len})."
                ),
            );
        }
    }
    trimmed.to_string()
}

/// Checks an optional image upload. An absent file is always acceptable.
pub(crate) fn check_image(errors: &mut ValidationErrors, field: &str, image: Option<&ImageUpload>) {
    let Some(image) = image else {
        return;
    };
    if image.bytes.is_empty() {
        errors.add(field, "El fichero enviado está vacío.");
        return;
    }
    match image.extension() {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => {}
        ext => errors.add(
            field,
            format!(
                "La extensión de fichero “{}” no está permitida. Las extensiones permitidas son: {}.",
                ext.unwrap_or_default(),
                IMAGE_EXTENSIONS.join(", ")
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_limits() {
        let mut errors = ValidationErrors::new();
        assert_eq!(required_text(&mut errors, "titulo", "  Piernas ", Some(100)), "Piernas");
        assert!(errors.is_empty());

        required_text(&mut errors, "titulo", "   ", Some(100));
        required_text(&mut errors, "nombre", &"x".repeat(101), Some(100));
        assert_eq!(errors.for_field("titulo").collect::<Vec<_>>(), vec![MSG_REQUIRED]);
        assert!(errors.for_field("nombre").next().unwrap().contains("(tiene 101)"));
    }

    #[test]
    fn max_length_counts_characters_not_bytes() {
        let mut errors = ValidationErrors::new();
        required_text(&mut errors, "titulo", &"ñ".repeat(100), Some(100));
        assert!(errors.is_empty());
    }

    #[test]
    fn image_rules() {
        let mut errors = ValidationErrors::new();
        check_image(&mut errors, "imagen", None);
        check_image(&mut errors, "imagen", Some(&ImageUpload::new("a.png", None, vec![1, 2])));
        assert!(errors.is_empty());

        check_image(&mut errors, "imagen", Some(&ImageUpload::new("a.png", None, Vec::new())));
        check_image(&mut errors, "imagen", Some(&ImageUpload::new("a.exe", None, vec![1])));
        assert_eq!(errors.for_field("imagen").count(), 2);
    }

    #[test]
    fn form_errors_have_no_field() {
        let mut errors = ValidationErrors::new();
        errors.add_form_error("El usuario ya existe");
        assert_eq!(errors.form_errors().collect::<Vec<_>>(), vec!["El usuario ya existe"]);
        assert!(errors.into_result(()).is_err());
    }
}
