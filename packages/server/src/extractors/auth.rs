use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::session;

/// Name of the HttpOnly cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "admin_session";

/// Verified admin session extracted from the request cookies.
///
/// Add this as a handler parameter to gate the handler behind the admin
/// login. There is a single admin identity; no per-user permissions.
pub struct AdminSession {
    pub subject: String,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar.get(SESSION_COOKIE).ok_or(AppError::TokenMissing)?;

        let claims = session::verify(&state.config.auth.session_secret, cookie.value())
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AdminSession {
            subject: claims.sub,
        })
    }
}
