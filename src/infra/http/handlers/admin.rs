use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use folio_api_types::AdminEmailResponse;

use crate::infra::http::AppState;
use crate::infra::http::error::JsonError;

const PUBLIC_SOURCE: &str = "infra::http::admin::email";
const GUARDED_SOURCE: &str = "infra::http::admin::guarded_email";

pub async fn admin_email(
    State(state): State<AppState>,
) -> Result<Json<AdminEmailResponse>, JsonError> {
    let email = state
        .admin
        .admin_email()
        .await
        .map_err(|err| JsonError::from_admin(PUBLIC_SOURCE, err))?;
    Ok(Json(AdminEmailResponse { email }))
}

/// Same lookup as [`admin_email`], behind a bearer token.
pub async fn guarded_admin_email(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AdminEmailResponse>, JsonError> {
    let authorized = bearer_token(&headers)
        .map(|token| state.admin_token.verify(token))
        .unwrap_or(false);
    if !authorized {
        return Err(JsonError::plain(
            GUARDED_SOURCE,
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
        ));
    }

    let email = state
        .admin
        .admin_email()
        .await
        .map_err(|err| JsonError::from_admin(GUARDED_SOURCE, err))?;
    Ok(Json(AdminEmailResponse { email }))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
