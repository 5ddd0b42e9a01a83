//! View-models handed to the presentation layer.
//!
//! Each response names the view it feeds (`view`) and carries the values that
//! view renders. They are serialized as JSON; a templating layer consumes the
//! same shapes.

use core_types::validation::{
    ExerciseFormValues, RegistrationFormValues, ValidationErrors, WorkoutFormValues,
};
use core_types::{DetailMode, Exercise, Page, User, Workout};
use serde::Serialize;

pub const VIEW_HOME: &str = "pages/home";
pub const VIEW_CATALOG: &str = "workouts/index";
pub const VIEW_WORKOUT_DETAIL: &str = "workouts/detail";
pub const VIEW_WORKOUT_CREATE: &str = "workouts/create";
pub const VIEW_WORKOUT_EDIT: &str = "workouts/edit";
pub const VIEW_EXERCISE_CREATE: &str = "exercises/create";
pub const VIEW_EXERCISE_EDIT: &str = "exercises/edit";
pub const VIEW_BOOKMARKS: &str = "workouts/bookmarked";
pub const VIEW_REGISTER: &str = "pages/register";
pub const VIEW_LOGIN: &str = "pages/login";

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub view: &'static str,
    pub show_navbar: bool,
    pub user: Option<User>,
}

/// The shared catalog listing. Exactly one of `workouts` / `exercises` is set.
#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub view: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workouts: Option<Page<Workout>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Page<Exercise>>,
    pub show_exercises: bool,
    pub query: String,
    pub show_navbar: bool,
    pub user: Option<User>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutDetailView {
    pub view: &'static str,
    pub workout: Workout,
    pub exercises: Page<Exercise>,
    pub mode: DetailMode,
    /// Whether the signed-in user has bookmarked this workout.
    pub bookmarked: bool,
    pub show_navbar: bool,
    pub user: Option<User>,
}

/// A form's submitted (or pre-populated) values plus any validation errors.
#[derive(Debug, Serialize)]
pub struct FormState<V> {
    pub values: V,
    pub errors: ValidationErrors,
}

impl<V> FormState<V> {
    pub fn clean(values: V) -> Self {
        Self {
            values,
            errors: ValidationErrors::new(),
        }
    }

    pub fn with_errors(values: V, errors: ValidationErrors) -> Self {
        Self { values, errors }
    }
}

#[derive(Debug, Serialize)]
pub struct WorkoutFormView {
    pub view: &'static str,
    pub form: FormState<WorkoutFormValues>,
    /// Every exercise, for the selection list.
    pub exercises: Vec<Exercise>,
    /// Set when editing.
    pub workout_id: Option<i64>,
    pub current_image: Option<String>,
    pub show_navbar: bool,
}

#[derive(Debug, Serialize)]
pub struct ExerciseFormView {
    pub view: &'static str,
    pub form: FormState<ExerciseFormValues>,
    pub exercise_id: Option<i64>,
    pub current_image: Option<String>,
    pub show_navbar: bool,
}

#[derive(Debug, Serialize)]
pub struct BookmarksView {
    pub view: &'static str,
    pub workouts: Vec<Workout>,
    pub show_navbar: bool,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct RegisterView {
    pub view: &'static str,
    pub form: FormState<RegistrationFormValues>,
    pub show_navbar: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct LoginValues {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginView {
    pub view: &'static str,
    pub form: FormState<LoginValues>,
    /// Generic failure message; never says which credential was wrong.
    pub error: String,
    pub next: Option<String>,
    pub show_navbar: bool,
}
