//! Wiring of repositories, cache and services into the HTTP state.

use std::sync::Arc;
use std::time::Duration;

use crate::application::admin::{AdminService, AdminTokenVerifier};
use crate::application::catalog::EntityStore;
use crate::application::contacts::ContactService;
use crate::application::images::ImageNormalizer;
use crate::application::notify::Notifier;
use crate::application::projects::ProjectService;
use crate::application::repos::{AdminRepo, EntityRepo, HealthRepo};
use crate::application::reviews::ReviewService;
use crate::application::skills::SkillService;
use crate::cache::{CachePolicy, SharedCache};
use crate::config::Settings;
use crate::domain::entities::{Contact, Project, Review, Skill};

use super::http::{AppState, UploadLimits};

/// Every persistence port the service needs.
#[derive(Clone)]
pub struct Backends {
    pub reviews: Arc<dyn EntityRepo<Review>>,
    pub contacts: Arc<dyn EntityRepo<Contact>>,
    pub projects: Arc<dyn EntityRepo<Project>>,
    pub skills: Arc<dyn EntityRepo<Skill>>,
    pub admins: Arc<dyn AdminRepo>,
    pub health: Arc<dyn HealthRepo>,
}

impl Backends {
    /// Use one adapter for every port.
    pub fn uniform<R>(repo: Arc<R>) -> Self
    where
        R: EntityRepo<Review>
            + EntityRepo<Contact>
            + EntityRepo<Project>
            + EntityRepo<Skill>
            + AdminRepo
            + HealthRepo
            + 'static,
    {
        Self {
            reviews: repo.clone(),
            contacts: repo.clone(),
            projects: repo.clone(),
            skills: repo.clone(),
            admins: repo.clone(),
            health: repo,
        }
    }
}

/// Knobs that shape the assembled services.
#[derive(Debug, Clone)]
pub struct StateOptions {
    pub list_ttl: Duration,
    pub normalizer: ImageNormalizer,
    pub uploads: UploadLimits,
    pub admin_token: AdminTokenVerifier,
}

impl StateOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            list_ttl: settings.cache.list_ttl,
            normalizer: ImageNormalizer::new(
                settings.images.target_width.get(),
                settings.images.jpeg_quality,
            ),
            uploads: UploadLimits {
                max_file_bytes: settings.uploads.max_file_bytes.get(),
                max_gallery_images: settings.uploads.max_gallery_images.get(),
                max_request_bytes: settings.uploads.max_request_bytes(),
            },
            admin_token: AdminTokenVerifier::from_hex(settings.admin.token_sha256.as_deref()),
        }
    }
}

pub fn assemble_state(
    backends: Backends,
    cache: Arc<SharedCache>,
    notifier: Arc<dyn Notifier>,
    options: StateOptions,
) -> AppState {
    let ttl = options.list_ttl;
    let reviews = EntityStore::new(
        backends.reviews,
        cache.clone(),
        CachePolicy::REVIEWS.with_ttl(ttl),
    );
    let projects = EntityStore::new(
        backends.projects,
        cache.clone(),
        CachePolicy::PROJECTS.with_ttl(ttl),
    );
    let skills = EntityStore::new(backends.skills, cache, CachePolicy::SKILLS.with_ttl(ttl));

    AppState {
        reviews: ReviewService::new(reviews, notifier.clone()),
        contacts: ContactService::new(backends.contacts, notifier),
        projects: ProjectService::new(projects, options.normalizer),
        skills: SkillService::new(skills),
        admin: AdminService::new(backends.admins),
        admin_token: options.admin_token,
        health: backends.health,
        uploads: options.uploads,
    }
}
