/// Error handling for the API server
///
/// Every handler returns `Result<T, ApiError>`. `ApiError` is the only place
/// failures become HTTP responses, so nothing reaches the transport layer as
/// an unstructured fault.
///
/// # Response Bodies
///
/// ```json
/// // 422
/// { "errors": [ { "field": "email", "message": "email is required" } ] }
///
/// // everything else
/// { "status": "Bad request", "message": "Authentication failed", "statusCode": 401 }
/// ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use orgauth_shared::{
    auth::{jwt::TokenError, password::PasswordError},
    store::StoreError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Unprocessable entity (422) - every failing field at once
    ValidationError(Vec<ValidationErrorDetail>),

    /// Email already registered (400)
    DuplicateEmail,

    /// Wrong credentials (401), identical for unknown email and wrong password
    AuthenticationFailed,

    /// Missing, invalid or expired session, or unknown subject (401)
    Unauthorized,

    /// Not found (404)
    NotFound(String),

    /// Unparseable request (400)
    BadRequest(String),

    /// Internal server error (500); the message is logged, never returned
    InternalFault(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation, in its JSON (camelCase) spelling
    pub field: String,

    pub message: String,
}

impl ValidationErrorDetail {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Body of a 422 response
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<ValidationErrorDetail>,
}

/// Body of every other error response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub status_code: u16,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::DuplicateEmail | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::DuplicateEmail => write!(f, "Email already registered"),
            ApiError::AuthenticationFailed => write!(f, "Authentication failed"),
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::InternalFault(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (label, message) = match self {
            ApiError::ValidationError(errors) => {
                return (status, Json(ValidationErrorResponse { errors })).into_response();
            }
            ApiError::DuplicateEmail => ("Bad request", "Registration unsuccessful".to_string()),
            ApiError::AuthenticationFailed => ("Bad request", "Authentication failed".to_string()),
            ApiError::Unauthorized => ("error", "Unauthorized".to_string()),
            ApiError::NotFound(msg) => ("error", msg),
            ApiError::BadRequest(msg) => ("Bad request", msg),
            ApiError::InternalFault(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("error", "An internal error occurred".to_string())
            }
        };

        let body = Json(ErrorResponse {
            status: label.to_string(),
            message,
            status_code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_duplicate_email() {
            return ApiError::DuplicateEmail;
        }
        ApiError::InternalFault(err.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalFault(format!("Password operation failed: {}", err))
    }
}

/// Only signing reaches this conversion; verification failures are
/// collapsed to `Unauthorized` by the auth gate.
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::InternalFault(err.to_string())
    }
}

/// The parser's message stays in the logs; the client gets a fixed body.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(
            status = %rejection.status(),
            detail = %rejection.body_text(),
            "Rejected request body"
        );
        ApiError::BadRequest("Client error".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::ValidationError(vec![]).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::AuthenticationFailed.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::NotFound("x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InternalFault("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_validation_body_lists_every_field() {
        let err = ApiError::ValidationError(vec![
            ValidationErrorDetail::new("firstName", "firstName is required"),
            ValidationErrorDetail::new("email", "email is required"),
        ]);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert_eq!(json["errors"].as_array().unwrap().len(), 2);
        assert_eq!(json["errors"][0]["field"], "firstName");
    }

    #[tokio::test]
    async fn test_internal_fault_hides_detail() {
        let response = ApiError::InternalFault("connection refused".to_string()).into_response();
        let json = body_json(response).await;

        assert_eq!(json["statusCode"], 500);
        assert!(!json.to_string().contains("connection refused"));
    }

    #[test]
    fn test_store_duplicate_maps_to_duplicate_email() {
        let err = ApiError::from(StoreError::UniqueViolation {
            constraint: "users_email_key".to_string(),
        });
        assert!(matches!(err, ApiError::DuplicateEmail));

        let err = ApiError::from(StoreError::MissingReference("organisation".to_string()));
        assert!(matches!(err, ApiError::InternalFault(_)));
    }
}
