//! JSON error responses.
//!
//! Each endpoint family answers failures with the body shape its frontend
//! already parses. Every response also carries an [`ErrorReport`] for the
//! response-logging middleware.

use std::error::Error as StdError;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_api_types::{ContactResponse, ErrorResponse, ReviewsResponse, UploadFailure};
use serde_json::Value;

use crate::application::catalog::StoreError;
use crate::application::error::{AdminError, ErrorReport, SubmissionError, UploadError};

pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug)]
pub struct JsonError {
    status: StatusCode,
    body: Value,
    report: ErrorReport,
}

impl JsonError {
    fn new(status: StatusCode, body: impl serde::Serialize, report: ErrorReport) -> Self {
        let body = serde_json::to_value(body).unwrap_or(Value::Null);
        Self {
            status,
            body,
            report,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// `{ "error": message }`
    pub fn plain(source: &'static str, status: StatusCode, message: &str) -> Self {
        Self::new(
            status,
            ErrorResponse::new(message),
            ErrorReport::from_message(source, status, message),
        )
    }

    fn plain_from(
        source: &'static str,
        status: StatusCode,
        message: &str,
        err: &dyn StdError,
    ) -> Self {
        Self::new(
            status,
            ErrorResponse::new(message),
            ErrorReport::from_error(source, status, err),
        )
    }

    /// Deletion failures: 404 names the entity, anything else is a 500.
    pub fn from_delete(source: &'static str, label: &str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::plain(
                source,
                StatusCode::NOT_FOUND,
                &format!("{label} not found"),
            ),
            StoreError::Repo(ref inner) => {
                Self::plain_from(source, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR, inner)
            }
        }
    }

    pub fn from_review_submission(err: SubmissionError) -> Self {
        const SOURCE: &str = "infra::http::reviews::create";
        let status = submission_status(&err);
        let message = match &err {
            SubmissionError::Validation(inner) => inner.to_string(),
            SubmissionError::Notify(_) => "Review saved but notification failed".to_string(),
            SubmissionError::Store(_) => "Failed to submit review".to_string(),
        };
        Self::new(
            status,
            ErrorResponse::new(message),
            ErrorReport::from_error(SOURCE, status, &err),
        )
    }

    pub fn from_contact_submission(err: SubmissionError) -> Self {
        const SOURCE: &str = "infra::http::contacts::create";
        let status = submission_status(&err);
        let message = match &err {
            SubmissionError::Validation(inner) => inner.to_string(),
            SubmissionError::Notify(_) => "Contact saved but notification failed".to_string(),
            SubmissionError::Store(_) => "Failed to save contact details".to_string(),
        };
        Self::new(
            status,
            ContactResponse::failure(message),
            ErrorReport::from_error(SOURCE, status, &err),
        )
    }

    /// Unreadable `/reviews` bodies answer `{ error }` with 400, whatever axum's status.
    pub fn from_review_body(rejection: JsonRejection) -> Self {
        const SOURCE: &str = "infra::http::reviews::create";
        let status = StatusCode::BAD_REQUEST;
        Self::new(
            status,
            ErrorResponse::new(body_message(&rejection)),
            ErrorReport::from_error(SOURCE, status, &rejection),
        )
    }

    /// Unreadable `/contact` bodies answer `{ success: false, error }` with 400.
    pub fn from_contact_body(rejection: JsonRejection) -> Self {
        const SOURCE: &str = "infra::http::contacts::create";
        let status = StatusCode::BAD_REQUEST;
        Self::new(
            status,
            ContactResponse::failure(body_message(&rejection)),
            ErrorReport::from_error(SOURCE, status, &rejection),
        )
    }

    /// Upload failures answer `{ message, error }`.
    pub fn from_upload(source: &'static str, message: &str, err: UploadError) -> Self {
        let status = match &err {
            UploadError::Validation(_) => StatusCode::BAD_REQUEST,
            UploadError::PayloadTooLarge { .. } | UploadError::RequestTooLarge => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            UploadError::Image(_) | UploadError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let detail = match &err {
            UploadError::Store(_) => INTERNAL_ERROR.to_string(),
            other => other.to_string(),
        };
        Self::new(
            status,
            UploadFailure {
                message: message.to_string(),
                error: detail,
            },
            ErrorReport::from_error(source, status, &err),
        )
    }

    /// `/getreviews` degrades to an empty list alongside the error.
    pub fn from_review_list(err: StoreError) -> Self {
        const SOURCE: &str = "infra::http::reviews::list";
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        Self::new(
            status,
            ReviewsResponse::<()>::failure(INTERNAL_ERROR),
            ErrorReport::from_error(SOURCE, status, &err),
        )
    }

    /// Project and skill lists degrade to a bare empty array.
    pub fn empty_list(source: &'static str, err: StoreError) -> Self {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        Self::new(
            status,
            Vec::<()>::new(),
            ErrorReport::from_error(source, status, &err),
        )
    }

    pub fn from_admin(source: &'static str, err: AdminError) -> Self {
        match err {
            AdminError::NotFound => {
                Self::plain(source, StatusCode::NOT_FOUND, "Admin email not found")
            }
            other => Self::plain_from(
                source,
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR,
                &other,
            ),
        }
    }
}

fn body_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Request body must be sent as application/json".to_string()
        }
        other => format!("Invalid JSON body: {}", other.body_text()),
    }
}

fn submission_status(err: &SubmissionError) -> StatusCode {
    match err {
        SubmissionError::Validation(_) => StatusCode::BAD_REQUEST,
        SubmissionError::Store(_) | SubmissionError::Notify(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        self.report.attach(&mut response);
        response
    }
}
