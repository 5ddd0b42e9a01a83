use super::{check_image, required_text, ValidationErrors};
use crate::structs::ImageUpload;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

pub const FIELD_TITLE: &str = "titulo";
pub const FIELD_NAME: &str = "nombre";
pub const FIELD_DESCRIPTION: &str = "descripcion";
pub const FIELD_EXERCISES: &str = "ejercicios";
pub const FIELD_IMAGE: &str = "imagen";

/// Longest title or name a workout or exercise may carry.
pub const MAX_TITLE_CHARS: usize = 100;

/// Raw values of the workout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutInput {
    pub title: String,
    pub description: String,
    /// Submitted exercise identifiers, unparsed.
    pub exercise_ids: Vec<String>,
    pub image: Option<ImageUpload>,
}

/// Raw values of the exercise form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseInput {
    pub name: String,
    pub description: String,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidWorkout {
    pub title: String,
    pub description: String,
    /// Distinct, ascending.
    pub exercise_ids: Vec<i64>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidExercise {
    pub name: String,
    pub description: String,
    pub image: Option<ImageUpload>,
}

/// Values echoed back to a re-rendered workout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkoutFormValues {
    pub titulo: String,
    pub descripcion: String,
    pub ejercicios: Vec<String>,
}

impl From<&WorkoutInput> for WorkoutFormValues {
    fn from(input: &WorkoutInput) -> Self {
        Self {
            titulo: input.title.clone(),
            descripcion: input.description.clone(),
            ejercicios: input.exercise_ids.clone(),
        }
    }
}

/// Values echoed back to a re-rendered exercise form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExerciseFormValues {
    pub nombre: String,
    pub descripcion: String,
}

impl From<&ExerciseInput> for ExerciseFormValues {
    fn from(input: &ExerciseInput) -> Self {
        Self {
            nombre: input.name.clone(),
            descripcion: input.description.clone(),
        }
    }
}

/// Validates a workout submission.
///
/// `known_exercises` is the set of exercise identifiers that currently exist;
/// any submitted identifier outside it is rejected. The exercise set may be empty.
pub fn validate_workout(
    input: WorkoutInput,
    known_exercises: &HashSet<i64>,
) -> Result<ValidWorkout, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = required_text(&mut errors, FIELD_TITLE, &input.title, Some(MAX_TITLE_CHARS));
    let description = required_text(&mut errors, FIELD_DESCRIPTION, &input.description, None);

    let mut exercise_ids = BTreeSet::new();
    for raw in input.exercise_ids.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        match raw.parse::<i64>() {
            Ok(id) if known_exercises.contains(&id) => {
                exercise_ids.insert(id);
            }
            Ok(_) => errors.add(
                FIELD_EXERCISES,
                format!("Seleccione una opción válida. {raw} no es una de las opciones disponibles."),
            ),
            Err(_) => errors.add(FIELD_EXERCISES, format!("“{raw}” no es un valor válido.")),
        }
    }

    check_image(&mut errors, FIELD_IMAGE, input.image.as_ref());

    errors.into_result(ValidWorkout {
        title,
        description,
        exercise_ids: exercise_ids.into_iter().collect(),
        image: input.image,
    })
}

/// Validates an exercise submission.
pub fn validate_exercise(input: ExerciseInput) -> Result<ValidExercise, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = required_text(&mut errors, FIELD_NAME, &input.name, Some(MAX_TITLE_CHARS));
    let description = required_text(&mut errors, FIELD_DESCRIPTION, &input.description, None);
    check_image(&mut errors, FIELD_IMAGE, input.image.as_ref());

    errors.into_result(ValidExercise {
        name,
        description,
        image: input.image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workout(title: &str, description: &str, ids: &[&str]) -> WorkoutInput {
        WorkoutInput {
            title: title.to_string(),
            description: description.to_string(),
            exercise_ids: ids.iter().map(|s| s.to_string()).collect(),
            image: None,
        }
    }

    #[test]
    fn valid_workout_deduplicates_exercises() {
        let known: HashSet<i64> = [1, 2, 3].into_iter().collect();
        let valid = validate_workout(workout("Full body", "Todo", &["3", "1", "3"]), &known).unwrap();
        assert_eq!(valid.title, "Full body");
        assert_eq!(valid.exercise_ids, vec![1, 3]);
        assert!(valid.image.is_none());
    }

    #[test]
    fn empty_exercise_set_is_allowed() {
        let valid = validate_workout(workout("Cardio", "Correr", &[]), &HashSet::new()).unwrap();
        assert!(valid.exercise_ids.is_empty());
    }

    #[test]
    fn unknown_and_malformed_exercise_ids_are_rejected() {
        let known: HashSet<i64> = [1].into_iter().collect();
        let errors = validate_workout(workout("Cardio", "Correr", &["1", "42", "abc"]), &known)
            .unwrap_err();
        let messages: Vec<_> = errors.for_field(FIELD_EXERCISES).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("42"));
        assert!(messages[1].contains("abc"));
    }

    #[test]
    fn all_missing_fields_are_reported_together() {
        let errors = validate_workout(workout(" ", "", &[]), &HashSet::new()).unwrap_err();
        assert!(errors.has_field(FIELD_TITLE));
        assert!(errors.has_field(FIELD_DESCRIPTION));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn exercise_name_is_limited_to_100_chars() {
        let input = ExerciseInput {
            name: "a".repeat(101),
            description: "desc".into(),
            image: None,
        };
        let errors = validate_exercise(input).unwrap_err();
        assert!(errors.has_field(FIELD_NAME));
        assert!(!errors.has_field(FIELD_DESCRIPTION));
    }

    #[test]
    fn exercise_with_image_keeps_upload() {
        let input = ExerciseInput {
            name: "Sentadilla".into(),
            description: "Piernas".into(),
            image: Some(ImageUpload::new("squat.webp", None, vec![0xff])),
        };
        let valid = validate_exercise(input).unwrap();
        assert_eq!(valid.image.unwrap().file_name, "squat.webp");
    }
}
