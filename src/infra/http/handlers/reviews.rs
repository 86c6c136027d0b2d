use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use folio_api_types::{MessageResponse, ReviewSubmission, ReviewsResponse};

use crate::domain::entities::Review;
use crate::infra::http::AppState;
use crate::infra::http::error::JsonError;

use super::parse_record_id;

const DELETE_SOURCE: &str = "infra::http::reviews::delete";

pub async fn create_review(
    State(state): State<AppState>,
    body: Result<Json<ReviewSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, JsonError> {
    let Json(body) = body.map_err(JsonError::from_review_body)?;
    let rating = body.rating.as_ref().and_then(|value| value.as_f64());
    state
        .reviews
        .create(body.review, body.name, rating)
        .await
        .map_err(JsonError::from_review_submission)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Review submitted successfully")),
    ))
}

pub async fn list_reviews(
    State(state): State<AppState>,
) -> Result<Json<ReviewsResponse<Review>>, JsonError> {
    let reviews = state
        .reviews
        .list()
        .await
        .map_err(JsonError::from_review_list)?;
    Ok(Json(ReviewsResponse::ok(reviews.as_ref().clone())))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, JsonError> {
    let Some(id) = parse_record_id(&id) else {
        return Err(JsonError::plain(
            DELETE_SOURCE,
            StatusCode::NOT_FOUND,
            "Review not found",
        ));
    };

    state
        .reviews
        .delete(id)
        .await
        .map_err(|err| JsonError::from_delete(DELETE_SOURCE, "Review", err))?;

    Ok(Json(MessageResponse::new("Review deleted successfully")))
}
