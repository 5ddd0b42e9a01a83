//! The identity collaborator: credential checks, account creation and
//! sign-in sessions. Handlers reach identities only through these functions.

use super::password::{hash_password, verify_password};
use crate::{error::AppError, AppState};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use core_types::validation::ValidRegistration;
use core_types::User;
use database::NewUser;

/// Verifies a username/password pair. `None` for unknown users and wrong passwords alike.
pub async fn authenticate(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let Some(user) = state.db_repo.find_user_by_username(username).await? else {
        tracing::info!(%username, "Sign-in for unknown user.");
        return Ok(None);
    };

    let password = password.to_string();
    let phc = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &phc))
        .await
        .map_err(|e| anyhow::anyhow!("password verification task failed: {e}"))?;

    if verified {
        Ok(Some(user))
    } else {
        tracing::info!(%username, "Sign-in with wrong password.");
        Ok(None)
    }
}

/// Creates an identity from a validated registration.
///
/// A storage-level uniqueness conflict is returned as
/// `AppError::Database(DbError::UniqueViolation(_))` for the caller to report.
pub async fn register(state: &AppState, registration: ValidRegistration) -> Result<User, AppError> {
    let password = registration.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| anyhow::anyhow!("password hashing task failed: {e}"))??;

    let user = state
        .db_repo
        .create_user(&NewUser {
            username: registration.username,
            email: registration.email,
            first_name: registration.first_name,
            last_name: registration.last_name,
            password_hash,
        })
        .await?;
    Ok(user)
}

/// Opens a session for `user` and adds its cookie to the jar.
pub async fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> Result<CookieJar, AppError> {
    let session = &state.settings.session;
    let token = uuid::Uuid::new_v4().simple().to_string();
    let expires_at = Utc::now() + Duration::hours(i64::from(session.ttl_hours));

    state
        .db_repo
        .create_session(&token, user.id, expires_at)
        .await?;
    tracing::info!(user_id = user.id, "Session started.");

    let cookie = Cookie::build((session.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(session.secure_cookie);
    Ok(jar.add(cookie))
}

/// Ends the session named by the jar's cookie, if any, and expires the cookie.
pub async fn end_session(state: &AppState, jar: CookieJar) -> Result<CookieJar, AppError> {
    let name = state.settings.session.cookie_name.clone();
    if let Some(cookie) = jar.get(&name) {
        state.db_repo.delete_session(cookie.value()).await?;
        tracing::info!("Session ended.");
    }
    Ok(jar.remove(Cookie::build((name, "")).path("/")))
}

/// The user behind the jar's session cookie, when the session exists and has not expired.
pub async fn resolve_session(state: &AppState, jar: &CookieJar) -> Result<Option<User>, AppError> {
    let Some(cookie) = jar.get(&state.settings.session.cookie_name) else {
        return Ok(None);
    };
    let user = state
        .db_repo
        .find_session_user(cookie.value(), Utc::now())
        .await?;
    Ok(user)
}
