/// User lookup
///
/// - `GET /api/users/:id` - Public record of any user (authenticated)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
    response::Envelope,
};
use axum::{
    extract::{Path, State},
    Json,
};
use orgauth_shared::models::user::PublicUser;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: PublicUser,
}

/// A malformed id is reported the same way as an unknown one.
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<UserData>>> {
    let not_found = || ApiError::NotFound("User not found".to_string());

    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let user = state.store.find_user_by_id(id).await?.ok_or_else(not_found)?;

    tracing::debug!(user_id = %auth.user_id, target_id = %user.id, "User lookup");

    Ok(Json(Envelope::success(
        "User retrieved successfully",
        UserData {
            user: PublicUser::from(&user),
        },
    )))
}
