/// Authentication gate
///
/// [`AuthUser`] is an extractor: a handler that takes it as a parameter only
/// runs once the request carries a valid session for an existing user.
///
/// The token is read from the `user` cookie first and from an
/// `Authorization: Bearer` header when no cookie is present. Every failure
/// (no token, bad signature, expiry, unknown subject) is the same `401`.

use crate::{app::AppState, error::ApiError};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use orgauth_shared::{auth::jwt, models::user::User};
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "user";

/// The authenticated caller of a request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub user: User,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts).ok_or(ApiError::Unauthorized)?;

        let claims = jwt::verify_token(&token, state.jwt_secret()).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            ApiError::Unauthorized
        })?;

        let user = state
            .store
            .find_user_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = %claims.sub, "Session subject no longer exists");
                ApiError::Unauthorized
            })?;

        Ok(AuthUser {
            user_id: user.id,
            user,
        })
    }
}

/// Token carried by the request, cookie first
fn session_token(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Session cookie for a freshly issued token
///
/// Production sets `HttpOnly`, `Secure` and `SameSite=Strict`. Elsewhere the
/// cookie is readable by scripts and sent over plain HTTP.
pub fn session_cookie(token: String, production: bool) -> Cookie<'static> {
    let same_site = if production {
        SameSite::Strict
    } else {
        SameSite::Lax
    };

    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .max_age(time::Duration::days(jwt::SESSION_TTL_DAYS))
        .http_only(production)
        .secure(production)
        .same_site(same_site)
        .build()
}
