use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use folio_api_types::{ContactResponse, ContactSubmission};

use crate::infra::http::AppState;
use crate::infra::http::error::JsonError;

pub async fn create_contact(
    State(state): State<AppState>,
    body: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, JsonError> {
    let Json(body) = body.map_err(JsonError::from_contact_body)?;
    state
        .contacts
        .create(body.query, body.email, body.contact)
        .await
        .map_err(JsonError::from_contact_submission)?;

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse::success("Contact details saved successfully")),
    ))
}
