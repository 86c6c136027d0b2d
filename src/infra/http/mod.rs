//! HTTP surface for the portfolio frontend.

pub mod error;
pub mod handlers;
mod middleware;
pub mod multipart;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode},
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::warn;

use crate::application::{
    admin::{AdminService, AdminTokenVerifier},
    contacts::ContactService,
    error::ErrorReport,
    projects::ProjectService,
    repos::HealthRepo,
    reviews::ReviewService,
    skills::SkillService,
};

use self::handlers::{admin, contacts, projects, reviews, skills};
use self::middleware::{log_responses, set_request_context};

/// Upload bounds applied while reading multipart bodies.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_file_bytes: usize,
    pub max_gallery_images: usize,
    pub max_request_bytes: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub reviews: ReviewService,
    pub contacts: ContactService,
    pub projects: ProjectService,
    pub skills: SkillService,
    pub admin: AdminService,
    pub admin_token: AdminTokenVerifier,
    pub health: Arc<dyn HealthRepo>,
    pub uploads: UploadLimits,
}

/// Cross-cutting router options that do not belong to request handling.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub allowed_origin: Option<String>,
    pub static_dir: Option<PathBuf>,
}

pub fn build_router(state: AppState, options: &RouterOptions) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.uploads.max_request_bytes);

    let uploads = Router::new()
        .route("/uploadProject", post(projects::upload_project))
        .route("/uploadSkill", post(skills::upload_skill))
        .layer(upload_limit);

    let mut router = Router::new()
        .route("/reviews", post(reviews::create_review))
        .route("/getreviews", get(reviews::list_reviews))
        .route("/deleteReview/{id}", delete(reviews::delete_review))
        .route("/contact", post(contacts::create_contact))
        .route("/getProjects", get(projects::list_projects))
        .route("/deleteProject/{id}", delete(projects::delete_project))
        .route("/getSkills", get(skills::list_skills))
        .route("/deleteSkill/{id}", delete(skills::delete_skill))
        .route("/getAdmin", get(admin::admin_email))
        .route("/getAdminEmail", get(admin::guarded_admin_email))
        .route("/healthz", get(health))
        .merge(uploads);

    if let Some(dir) = options.static_dir.as_ref() {
        router = router.fallback_service(ServeDir::new(dir));
    }

    let router = router
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
        .layer(CompressionLayer::new());

    match cors_layer(options.allowed_origin.as_deref()) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?;
    let value = match HeaderValue::from_str(origin) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                target = "folio::http",
                origin = origin,
                error = %err,
                "ignoring allowed origin that is not a valid header value"
            );
            return None;
        }
    };

    Some(
        CorsLayer::new()
            .allow_origin(value)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
            ])
            .allow_credentials(true),
    )
}

async fn health(State(state): State<AppState>) -> Response {
    match state.health.ping().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
