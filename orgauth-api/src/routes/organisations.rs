/// Organisation membership endpoints
///
/// # Endpoints
///
/// - `GET /api/organisations` - Organisations of the caller (authenticated)
/// - `GET /api/organisations/:orgId` - One organisation (public)
/// - `POST /api/organisations` - Create an organisation (authenticated)
/// - `POST /api/organisations/:orgId/users` - Add a user (authenticated)
///
/// Reading a single organisation requires neither a session nor membership.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{null_as_empty, required, validate, ApiJson},
    middleware::auth::AuthUser,
    response::Envelope,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use orgauth_shared::models::organisation::{CreateOrganisation, PublicOrganisation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create organisation request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateOrganisationRequest {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "required"),
        length(max = 255, message = "name must be at most 255 characters")
    )]
    pub name: String,

    #[validate(length(max = 255, message = "description must be at most 255 characters"))]
    pub description: Option<String>,
}

/// Add member request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct AddMemberRequest {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(custom(function = "required"))]
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrganisationList {
    pub organisations: Vec<PublicOrganisation>,
}

fn organisation_not_found() -> ApiError {
    ApiError::NotFound("Organisation not found".to_string())
}

fn parse_id(raw: &str, not_found: fn() -> ApiError) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| not_found())
}

pub async fn list_organisations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Envelope<OrganisationList>>> {
    let organisations = state
        .store
        .list_organisations_for_user(auth.user_id)
        .await?
        .iter()
        .map(PublicOrganisation::from)
        .collect();

    Ok(Json(Envelope::success(
        "Organisations retrieved successfully",
        OrganisationList { organisations },
    )))
}

pub async fn get_organisation(
    State(state): State<AppState>,
    Path(org_id): Path<String>,
) -> ApiResult<Json<Envelope<PublicOrganisation>>> {
    let org_id = parse_id(&org_id, organisation_not_found)?;

    let organisation = state
        .store
        .find_organisation(org_id)
        .await?
        .ok_or_else(organisation_not_found)?;

    Ok(Json(Envelope::success(
        "Organisation retrieved successfully",
        PublicOrganisation::from(&organisation),
    )))
}

/// The caller becomes the first member of the new organisation.
pub async fn create_organisation(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateOrganisationRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<PublicOrganisation>>)> {
    validate(&req)?;

    let organisation = state
        .store
        .create_organisation(
            auth.user_id,
            CreateOrganisation {
                name: req.name,
                description: req.description,
            },
        )
        .await?;

    tracing::info!(user_id = %auth.user_id, org_id = %organisation.id, "Organisation created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(
            "Organisation created successfully",
            PublicOrganisation::from(&organisation),
        )),
    ))
}

/// Adding an existing member succeeds without changing anything.
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<String>,
    ApiJson(req): ApiJson<AddMemberRequest>,
) -> ApiResult<Json<Envelope<()>>> {
    validate(&req)?;

    let user_not_found = || ApiError::NotFound("User not found".to_string());

    let org_id = parse_id(&org_id, organisation_not_found)?;
    let organisation = state
        .store
        .find_organisation(org_id)
        .await?
        .ok_or_else(organisation_not_found)?;

    let user_id = parse_id(&req.user_id, user_not_found)?;
    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(user_not_found)?;

    let added = state.store.add_member(organisation.id, user.id).await?;

    tracing::info!(
        user_id = %auth.user_id,
        member_id = %user.id,
        org_id = %organisation.id,
        added,
        "Membership requested"
    );

    Ok(Json(Envelope::ack("User added to organisation successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_maps_to_not_found() {
        let err = parse_id("not-a-uuid", organisation_not_found).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "Organisation not found"));

        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), organisation_not_found).unwrap(), id);
    }

    #[test]
    fn test_add_member_request_requires_user_id() {
        let req: AddMemberRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());

        let req: AddMemberRequest = serde_json::from_str(r#"{"userId": null}"#).unwrap();
        assert!(req.validate().is_err());

        let req: AddMemberRequest = serde_json::from_str(r#"{"userId": "abc"}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_organisation_request_length_limits() {
        let req = CreateOrganisationRequest {
            name: "n".repeat(256),
            description: Some("d".repeat(256)),
        };

        let errors = req.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }
}
