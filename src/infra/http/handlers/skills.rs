use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use folio_api_types::MessageResponse;

use crate::domain::entities::{Skill, SkillFields};
use crate::infra::http::AppState;
use crate::infra::http::error::JsonError;
use crate::infra::http::multipart::{FileSlot, read_upload_form};

use super::parse_record_id;

const UPLOAD_SOURCE: &str = "infra::http::skills::upload";
const LIST_SOURCE: &str = "infra::http::skills::list";
const DELETE_SOURCE: &str = "infra::http::skills::delete";
const UPLOAD_FAILED: &str = "Uploading skill failed";

const SKILL_SLOTS: [FileSlot; 1] = [FileSlot {
    name: "icon",
    max_count: 1,
}];

pub async fn upload_skill(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, JsonError> {
    let mut form = read_upload_form(&mut multipart, &SKILL_SLOTS, state.uploads.max_file_bytes)
        .await
        .map_err(|err| JsonError::from_upload(UPLOAD_SOURCE, UPLOAD_FAILED, err))?;

    let fields = SkillFields {
        name: form.text("name"),
        experience: form.text("experience"),
        duration: form.text("duration"),
    };
    let icon = form.take_first("icon");

    state
        .skills
        .create(fields, icon)
        .await
        .map_err(|err| JsonError::from_upload(UPLOAD_SOURCE, UPLOAD_FAILED, err))?;

    Ok(Json(MessageResponse::new("Skill uploaded successfully")))
}

pub async fn list_skills(State(state): State<AppState>) -> Result<Json<Vec<Skill>>, JsonError> {
    let skills = state
        .skills
        .list()
        .await
        .map_err(|err| JsonError::empty_list(LIST_SOURCE, err))?;
    Ok(Json(skills.as_ref().clone()))
}

pub async fn delete_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, JsonError> {
    let Some(id) = parse_record_id(&id) else {
        return Err(JsonError::plain(
            DELETE_SOURCE,
            StatusCode::NOT_FOUND,
            "Skill not found",
        ));
    };

    state
        .skills
        .delete(id)
        .await
        .map_err(|err| JsonError::from_delete(DELETE_SOURCE, "Skill", err))?;

    Ok(Json(MessageResponse::new("Skill deleted successfully")))
}
