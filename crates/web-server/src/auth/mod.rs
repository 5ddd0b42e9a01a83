pub mod identity;
pub mod password;

pub use password::{hash_password, verify_password};

use crate::{error::AppError, AppState};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use core_types::User;
use std::sync::Arc;

/// Where unauthenticated requests to gated routes are sent.
pub const LOGIN_PATH: &str = "/inicio_sesion";

/// The signed-in user of a gated request, inserted by [`require_login`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// The signed-in user of a public request, if any.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

/// Login guard composed in front of every gated route.
///
/// Runs before the handler: with a live session the user is attached to the
/// request, otherwise the client is redirected to the sign-in page.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match identity::resolve_session(&state, &jar).await? {
        Some(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            Ok(next.run(request).await)
        }
        None => {
            let target = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            tracing::debug!(%target, "Unauthenticated request redirected to sign-in.");
            Ok(Redirect::to(&login_redirect(target)).into_response())
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(CurrentUser(user)) = parts.extensions.get::<CurrentUser>() {
            return Ok(MaybeUser(Some(user.clone())));
        }
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(MaybeUser(identity::resolve_session(state, &jar).await?))
    }
}

/// `/inicio_sesion?next=<target>`, with `target` percent-encoded.
pub fn login_redirect(target: &str) -> String {
    let mut encoded = String::with_capacity(target.len());
    for byte in target.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    format!("{LOGIN_PATH}?next={encoded}")
}

#[cfg(test)]
mod tests {
    use super::login_redirect;

    #[test]
    fn next_target_is_encoded() {
        assert_eq!(
            login_redirect("/entrenamientos/crear"),
            "/inicio_sesion?next=/entrenamientos/crear"
        );
        assert_eq!(
            login_redirect("/entrenamientos?q=a b&page=2"),
            "/inicio_sesion?next=/entrenamientos%3Fq%3Da%20b%26page%3D2"
        );
    }
}
