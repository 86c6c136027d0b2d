use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use folio_api_types::MessageResponse;

use crate::domain::entities::{Project, ProjectFields};
use crate::infra::http::AppState;
use crate::infra::http::error::JsonError;
use crate::infra::http::multipart::{FileSlot, read_upload_form};

use super::parse_record_id;

const UPLOAD_SOURCE: &str = "infra::http::projects::upload";
const LIST_SOURCE: &str = "infra::http::projects::list";
const DELETE_SOURCE: &str = "infra::http::projects::delete";
const UPLOAD_FAILED: &str = "Uploading projects failed";

pub async fn upload_project(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, JsonError> {
    let slots = [
        FileSlot {
            name: "logo",
            max_count: 1,
        },
        FileSlot {
            name: "uiuxImages",
            max_count: state.uploads.max_gallery_images,
        },
    ];

    let mut form = read_upload_form(&mut multipart, &slots, state.uploads.max_file_bytes)
        .await
        .map_err(|err| JsonError::from_upload(UPLOAD_SOURCE, UPLOAD_FAILED, err))?;

    let fields = ProjectFields {
        category: form.text("category"),
        description: form.text("description"),
        github_repo_link: form.text("githubRepoLink"),
        deployed_link: form.text("deployedLink"),
    };
    let logo = form.take_first("logo");
    let gallery = form.take_all("uiuxImages");

    state
        .projects
        .create(fields, logo, gallery)
        .await
        .map_err(|err| JsonError::from_upload(UPLOAD_SOURCE, UPLOAD_FAILED, err))?;

    Ok(Json(MessageResponse::new("Uploading projects successful")))
}

pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, JsonError> {
    let projects = state
        .projects
        .list()
        .await
        .map_err(|err| JsonError::empty_list(LIST_SOURCE, err))?;
    Ok(Json(projects.as_ref().clone()))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, JsonError> {
    let Some(id) = parse_record_id(&id) else {
        return Err(JsonError::plain(
            DELETE_SOURCE,
            StatusCode::NOT_FOUND,
            "Project not found",
        ));
    };

    state
        .projects
        .delete(id)
        .await
        .map_err(|err| JsonError::from_delete(DELETE_SOURCE, "Project", err))?;

    Ok(Json(MessageResponse::new("Project deleted successfully")))
}
