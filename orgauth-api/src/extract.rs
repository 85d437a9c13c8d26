/// Request body extraction and validation
///
/// [`ApiJson`] replaces `axum::Json` as an input extractor so that malformed
/// bodies become [`ApiError::BadRequest`] instead of axum's plain-text
/// rejection. [`validate`] runs `validator` rules and turns the result into
/// the exhaustive 422 error list.

use crate::error::{ApiError, ValidationErrorDetail};
use axum::extract::FromRequest;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError, ValidationErrors};

/// Error code of the [`required`] rule
const REQUIRED: &str = "required";

/// JSON body whose parse failures are reported as [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Reads a JSON `null` as an empty string
///
/// Paired with `#[serde(default)]` so an absent key, `null` and `""` all
/// reach validation as the same missing value.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Rejects empty and whitespace-only values
pub fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(REQUIRED));
    }
    Ok(())
}

/// Validates a request, reporting every failing field
pub fn validate<T: Validate>(request: &T) -> Result<(), ApiError> {
    request
        .validate()
        .map_err(|errors| ApiError::ValidationError(field_errors(&errors)))
}

/// One entry per field, sorted by field name
///
/// A missing value is reported as such even when other rules on the same
/// field also failed; otherwise the first failing rule wins.
fn field_errors(errors: &ValidationErrors) -> Vec<ValidationErrorDetail> {
    let mut details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, field_errors)| {
            let error = field_errors
                .iter()
                .find(|e| e.code == REQUIRED)
                .or_else(|| field_errors.first())?;
            let name = camel_case(&field);
            let message = match &error.message {
                Some(message) => message.to_string(),
                None if error.code == REQUIRED => format!("{} is required", name),
                None => format!("{} is invalid", name),
            };
            Some(ValidationErrorDetail::new(name, message))
        })
        .collect();

    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
