use crate::{
    auth::identity,
    error::AppError,
    views::{FormState, LoginValues, LoginView, RegisterView, VIEW_LOGIN, VIEW_REGISTER},
    AppState,
};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use core_types::validation::{
    validate_login, validate_registration, LoginInput, RegistrationFormValues, RegistrationInput,
    UniquenessCheck, ValidationErrors,
};
use database::DbError;
use serde::Deserialize;
use std::sync::Arc;

pub const MSG_BAD_CREDENTIALS: &str = "Credenciales incorrectas, por favor inténtelo de nuevo";
pub const MSG_USER_EXISTS: &str = "El usuario ya existe";

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

fn register_view(form: FormState<RegistrationFormValues>) -> Json<RegisterView> {
    Json(RegisterView {
        view: VIEW_REGISTER,
        form,
        show_navbar: false,
    })
}

fn login_view(form: FormState<LoginValues>, error: &str, next: Option<String>) -> Json<LoginView> {
    Json(LoginView {
        view: VIEW_LOGIN,
        form,
        error: error.to_string(),
        next,
        show_navbar: false,
    })
}

/// # GET /registro
pub async fn register_form() -> Json<RegisterView> {
    register_view(FormState::clean(RegistrationFormValues::default()))
}

/// # POST /registro
///
/// A valid registration creates the account and signs it in straight away.
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(input): Form<RegistrationInput>,
) -> Result<Response, AppError> {
    let existing = UniquenessCheck {
        username_taken: state.db_repo.username_exists(input.username.trim()).await?,
        email_taken: state.db_repo.email_exists(input.email.trim()).await?,
    };
    let values = RegistrationFormValues::from(&input);

    let valid = match validate_registration(&input, existing) {
        Ok(valid) => valid,
        Err(errors) => {
            return Ok(register_view(FormState::with_errors(values, errors)).into_response());
        }
    };

    // The existence checks above can race a concurrent registration; the
    // unique constraints are the final word.
    let user = match identity::register(&state, valid).await {
        Ok(user) => user,
        Err(e) => {
            let errors = registration_conflict(e)?;
            return Ok(register_view(FormState::with_errors(values, errors)).into_response());
        }
    };

    let jar = identity::start_session(&state, jar, &user).await?;
    Ok((jar, Redirect::to("/entrenamientos")).into_response())
}

/// Turns a uniqueness violation on insert into a form-level error; any other
/// failure is passed through.
fn registration_conflict(error: AppError) -> Result<ValidationErrors, AppError> {
    match error {
        AppError::Database(DbError::UniqueViolation(detail)) => {
            tracing::warn!(%detail, "Registration rejected by a uniqueness constraint.");
            let mut errors = ValidationErrors::new();
            errors.add_form_error(MSG_USER_EXISTS);
            Ok(errors)
        }
        other => Err(other),
    }
}

/// # GET /inicio_sesion
pub async fn login_form(Query(query): Query<LoginQuery>) -> Json<LoginView> {
    login_view(FormState::clean(LoginValues::default()), "", query.next)
}

/// # POST /inicio_sesion
///
/// Failure never says which of the two credentials was wrong.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
    jar: CookieJar,
    Form(input): Form<LoginInput>,
) -> Result<Response, AppError> {
    let values = LoginValues {
        username: input.username.clone(),
    };

    let credentials = match validate_login(&input) {
        Ok(credentials) => credentials,
        Err(errors) => {
            let form = FormState::with_errors(values, errors);
            return Ok(login_view(form, "", query.next).into_response());
        }
    };

    match identity::authenticate(&state, &credentials.username, &credentials.password).await? {
        Some(user) => {
            let jar = identity::start_session(&state, jar, &user).await?;
            Ok((jar, Redirect::to("/")).into_response())
        }
        None => {
            let mut errors = ValidationErrors::new();
            errors.add_form_error(MSG_BAD_CREDENTIALS);
            let form = FormState::with_errors(values, errors);
            Ok(login_view(form, MSG_BAD_CREDENTIALS, query.next).into_response())
        }
    }
}

/// # GET|POST /cerrar_sesion
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let jar = identity::end_session(&state, jar).await?;
    Ok((jar, Redirect::to("/")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_becomes_a_form_error() {
        let error = AppError::Database(DbError::UniqueViolation(
            "UNIQUE constraint failed: users.username".into(),
        ));
        let errors = registration_conflict(error).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.form_errors().collect::<Vec<_>>(), vec![MSG_USER_EXISTS]);
        assert!(errors.iter().all(|e| e.field.is_none()));
    }

    #[test]
    fn other_failures_are_not_swallowed() {
        let error = AppError::Database(DbError::NotFound);
        assert!(matches!(
            registration_conflict(error),
            Err(AppError::Database(DbError::NotFound))
        ));
    }
}
