//! # FitGym Core Types
//!
//! The shared vocabulary of the catalog: persisted entities, the pagination
//! policy used by every listing, and the field validators that run before any
//! write reaches the database.
//!
//! As a Layer 0 crate it has no knowledge of HTTP or of the storage engine
//! beyond the `FromRow` derives on its entities.

// Declare the modules that make up this crate.
pub mod enums;
pub mod error;
pub mod pagination;
pub mod structs;
pub mod validation;

// Re-export the core types to provide a clean public API.
pub use enums::{DetailMode, MediaKind};
pub use error::CoreError;
pub use pagination::{
    Page, PageWindow, Paginator, EXERCISES_PER_PAGE, WORKOUTS_PER_PAGE,
    WORKOUT_EXERCISES_PER_PAGE,
};
pub use structs::{Exercise, ImageUpload, User, Workout, DEFAULT_IMAGE};
pub use validation::{FieldError, ValidationErrors};
