//! # FitGym Database Crate
//!
//! This crate is the application's persistence layer: an explicit data-access
//! API over SQLite for workouts, exercises, their many-to-many relation,
//! identities, sign-in sessions and per-user bookmarks.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** all SQL lives here. The rest of the application talks to
//!   `DbRepository` and never sees a query string.
//! - **Explicit schema:** the schema is defined by the embedded migrations in
//!   `migrations/`, applied with `run_migrations`.
//! - **Storage-level integrity:** uniqueness and cascades are enforced by
//!   constraints. Conflicting writes surface as `DbError::UniqueViolation`;
//!   the application performs no locking of its own.
//!
//! ## Public API
//!
//! - `connect`: establishes the connection pool.
//! - `run_migrations`: brings the schema up to date.
//! - `DbRepository`: every data access method, grouped by entity.
//! - `DbError`: the errors returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::{DbRepository, NewExercise, NewUser, NewWorkout};
