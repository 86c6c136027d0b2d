//! Domain entities mirrored from persistent storage.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::encoding::{base64_bytes, base64_bytes_seq};
use super::error::DomainError;

/// A persisted record kind with a creation payload.
pub trait Entity: Clone + Send + Sync + 'static {
    type Draft: Clone + Send + Sync + 'static;

    /// Lowercase name used in logs and error messages.
    const NAME: &'static str;

    fn id(&self) -> Uuid;

    /// Build the stored record from a validated draft.
    fn materialize(draft: Self::Draft, id: Uuid, created_at: OffsetDateTime) -> Self;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub text: String,
    pub name: String,
    pub rating: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub text: String,
    pub name: String,
    pub rating: f64,
}

impl ReviewDraft {
    pub fn new(
        text: Option<String>,
        name: Option<String>,
        rating: Option<f64>,
    ) -> Result<Self, DomainError> {
        let text = required("review", text)?;
        let name = required("name", name)?;
        let rating = rating
            .filter(|value| value.is_finite())
            .ok_or_else(|| DomainError::validation("`Rating` must be a number"))?;
        Ok(Self { text, name, rating })
    }
}

impl Entity for Review {
    type Draft = ReviewDraft;
    const NAME: &'static str = "review";

    fn id(&self) -> Uuid {
        self.id
    }

    fn materialize(draft: ReviewDraft, id: Uuid, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            text: draft.text,
            name: draft.name,
            rating: draft.rating,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub query: String,
    pub email: String,
    pub contact: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactDraft {
    pub query: String,
    pub email: String,
    pub contact: String,
}

impl ContactDraft {
    pub fn new(
        query: Option<String>,
        email: Option<String>,
        contact: Option<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            query: required("Query", query)?,
            email: required("email", email)?,
            contact: required("contact", contact)?,
        })
    }
}

impl Entity for Contact {
    type Draft = ContactDraft;
    const NAME: &'static str = "contact";

    fn id(&self) -> Uuid {
        self.id
    }

    fn materialize(draft: ContactDraft, id: Uuid, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            query: draft.query,
            email: draft.email,
            contact: draft.contact,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(with = "base64_bytes")]
    pub logo: Bytes,
    #[serde(with = "base64_bytes_seq")]
    pub uiux_images: Vec<Bytes>,
    pub github_repo_link: Option<String>,
    pub deployed_link: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Scalar fields submitted alongside project images.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFields {
    pub category: Option<String>,
    pub description: Option<String>,
    pub github_repo_link: Option<String>,
    pub deployed_link: Option<String>,
}

/// A project ready for persistence; images are already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub fields: ProjectFields,
    pub logo: Bytes,
    pub uiux_images: Vec<Bytes>,
}

impl Entity for Project {
    type Draft = ProjectDraft;
    const NAME: &'static str = "project";

    fn id(&self) -> Uuid {
        self.id
    }

    fn materialize(draft: ProjectDraft, id: Uuid, created_at: OffsetDateTime) -> Self {
        let ProjectDraft {
            fields,
            logo,
            uiux_images,
        } = draft;
        Self {
            id,
            category: fields.category,
            description: fields.description,
            logo,
            uiux_images,
            github_repo_link: fields.github_repo_link,
            deployed_link: fields.deployed_link,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: Uuid,
    pub name: Option<String>,
    #[serde(with = "base64_bytes")]
    pub icon: Bytes,
    pub experience: Option<String>,
    pub duration: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillFields {
    pub name: Option<String>,
    pub experience: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillDraft {
    pub fields: SkillFields,
    pub icon: Bytes,
}

impl Entity for Skill {
    type Draft = SkillDraft;
    const NAME: &'static str = "skill";

    fn id(&self) -> Uuid {
        self.id
    }

    fn materialize(draft: SkillDraft, id: Uuid, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            name: draft.fields.name,
            icon: draft.icon,
            experience: draft.fields.experience,
            duration: draft.fields.duration,
            created_at,
        }
    }
}

/// The site owner. Seeded out-of-band; the HTTP surface only reads the email.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminRecord {
    pub id: Uuid,
    pub email: String,
    /// Opaque credential hash managed by the login flow, never exposed.
    pub password_hash: Option<String>,
    pub created_at: OffsetDateTime,
}

fn required(field: &'static str, value: Option<String>) -> Result<String, DomainError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(DomainError::validation(format!("`{field}` is required"))),
    }
}
