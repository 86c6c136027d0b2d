//! Per-entity cache policies.
//!
//! Each cached list has one key and one TTL. The invalidation flags record
//! which writes drop the list; writes with the flag off leave the cached list
//! in place until it expires.

use std::time::Duration;

pub const REVIEWS_KEY: &str = "cachedReviews";
pub const PROJECTS_KEY: &str = "cachedProjects";
pub const SKILLS_KEY: &str = "cachedSkills";

pub const DEFAULT_LIST_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub key: &'static str,
    pub ttl: Duration,
    pub invalidate_on_create: bool,
    pub invalidate_on_delete: bool,
}

impl CachePolicy {
    /// Reviews are never invalidated on write; deletions show up once the list expires.
    pub const REVIEWS: Self = Self {
        key: REVIEWS_KEY,
        ttl: DEFAULT_LIST_TTL,
        invalidate_on_create: false,
        invalidate_on_delete: false,
    };

    pub const PROJECTS: Self = Self {
        key: PROJECTS_KEY,
        ttl: DEFAULT_LIST_TTL,
        invalidate_on_create: false,
        invalidate_on_delete: true,
    };

    pub const SKILLS: Self = Self {
        key: SKILLS_KEY,
        ttl: DEFAULT_LIST_TTL,
        invalidate_on_create: false,
        invalidate_on_delete: true,
    };

    pub const fn with_ttl(self, ttl: Duration) -> Self {
        Self { ttl, ..self }
    }
}
