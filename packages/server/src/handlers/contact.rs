use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::contact::{ContactRequest, ContactResponse, validate_contact_request};
use crate::notify;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Contact",
    operation_id = "submitContactForm",
    summary = "Submit the contact form",
    description = "Validates the submission, then sends an operator notification and a submitter acknowledgment. The pair is best-effort: the submission succeeds when the provider accepts either email.",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Submission accepted", body = ContactResponse),
        (status = 400, description = "Missing required field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Both sends failed (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(business = %payload.business_name))]
pub async fn submit_contact_form(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ContactRequest>,
) -> Result<Json<ContactResponse>, AppError> {
    validate_contact_request(&payload)?;

    notify::send_contact_emails(state.mailer.as_ref(), &state.config.email, &payload).await?;

    Ok(Json(ContactResponse {
        message: "Contact form submitted successfully".into(),
    }))
}
