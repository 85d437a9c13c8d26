/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register a new user with a default organisation
/// - `POST /auth/login` - Exchange credentials for a session
///
/// Both set the `user` session cookie and return the same token in the body
/// as `accessToken`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{null_as_empty, required, validate, ApiJson},
    middleware::auth::session_cookie,
    response::Envelope,
};
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use orgauth_shared::{
    auth::{jwt, password},
    models::{
        organisation::CreateOrganisation,
        user::{CreateUser, PublicUser, User},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
///
/// Absent keys and `null` both arrive as empty strings so that validation
/// reports every missing field together.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    /// At most 240 characters so the default organisation name fits in 255
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "required"),
        length(max = 240, message = "firstName must be at most 240 characters")
    )]
    pub first_name: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "required"),
        length(max = 255, message = "lastName must be at most 255 characters")
    )]
    pub last_name: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "required"),
        length(max = 255, message = "email must be at most 255 characters"),
        email(message = "email must be a valid email address")
    )]
    pub email: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(custom(function = "required"))]
    pub password: String,

    #[validate(length(max = 255, message = "phone must be at most 255 characters"))]
    pub phone: Option<String>,
}

/// Login request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(custom(function = "required"))]
    pub email: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(custom(function = "required"))]
    pub password: String,
}

/// Payload of a successful register or login
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub access_token: String,
    pub user: PublicUser,
}

type SessionResponse = (StatusCode, CookieJar, Json<Envelope<SessionData>>);

/// Register a new user
///
/// Creates the user, an organisation named `"{firstName}'s Organisation"`
/// and the membership linking them, all or nothing.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: one entry per invalid field
/// - `400 Bad Request`: email already registered
/// - `500 Internal Server Error`: hashing, signing or store failure
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<SessionResponse> {
    validate(&req)?;

    let password_hash = password::hash_password(&req.password)?;

    let organisation = CreateOrganisation::default_for(&req.first_name);
    let user = CreateUser {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        password_hash,
        phone: req.phone.filter(|p| !p.trim().is_empty()),
    };

    let (user, organisation) = state.store.register_user(user, organisation).await?;

    tracing::info!(
        user_id = %user.id,
        org_id = %organisation.id,
        "Registered user with default organisation"
    );

    issue_session(&state, jar, &user, StatusCode::CREATED, "Registration successful")
}

/// Log in with email and password
///
/// Unknown email, wrong password and a malformed email all produce the same
/// `401` so the response never reveals whether an account exists.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<SessionResponse> {
    validate(&req)?;

    let user = match state.store.find_user_by_email(&req.email).await? {
        Some(user) => user,
        None => {
            password::verify_dummy(&req.password);
            tracing::debug!("Login attempt for unknown account");
            return Err(ApiError::AuthenticationFailed);
        }
    };

    let verified = match password::verify_password(&req.password, &user.password_hash) {
        Ok(verified) => verified,
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "Stored password hash is unusable");
            false
        }
    };

    if !verified {
        tracing::debug!(user_id = %user.id, "Password mismatch");
        return Err(ApiError::AuthenticationFailed);
    }

    tracing::info!(user_id = %user.id, "User logged in");

    issue_session(&state, jar, &user, StatusCode::OK, "Login successful")
}

fn issue_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
    status: StatusCode,
    message: &str,
) -> ApiResult<SessionResponse> {
    let token = jwt::issue_session_token(user.id, state.jwt_secret())?;
    let jar = jar.add(session_cookie(token.clone(), state.config.api.production));

    let body = Envelope::success(
        message,
        SessionData {
            access_token: token,
            user: PublicUser::from(user),
        },
    );

    Ok((status, jar, Json(body)))
}
