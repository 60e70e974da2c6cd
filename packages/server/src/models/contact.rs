use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Contact-form submission, in the camelCase shape the public site posts.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "jane@acme.com")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[schema(example = "Acme Dental")]
    pub business_name: String,
    #[serde(default)]
    pub business_type: Option<String>,
    /// Number of locations, free-form.
    #[serde(default)]
    pub locations: Option<String>,
    pub message: String,
}

/// Required fields must be present and non-blank; everything else falls back
/// to literal placeholder text in the rendered emails.
pub fn validate_contact_request(payload: &ContactRequest) -> Result<(), AppError> {
    let required = [
        &payload.first_name,
        &payload.last_name,
        &payload.email,
        &payload.business_name,
        &payload.message,
    ];
    if required.iter().any(|f| f.trim().is_empty()) {
        return Err(AppError::Validation("Missing required fields".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContactResponse {
    #[schema(example = "Contact form submitted successfully")]
    pub message: String,
}
