use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::application::catalog::{EntityStore, StoreError};
use crate::application::error::UploadError;
use crate::application::images::ImageNormalizer;
use crate::domain::entities::{Project, ProjectDraft, ProjectFields};

#[derive(Clone)]
pub struct ProjectService {
    store: EntityStore<Project>,
    normalizer: ImageNormalizer,
}

impl ProjectService {
    pub fn new(store: EntityStore<Project>, normalizer: ImageNormalizer) -> Self {
        Self { store, normalizer }
    }

    pub async fn list(&self) -> Result<Arc<Vec<Project>>, StoreError> {
        self.store.list().await
    }

    /// Normalize every image, then persist. Nothing is stored if any image fails.
    pub async fn create(
        &self,
        fields: ProjectFields,
        logo: Option<Bytes>,
        gallery: Vec<Bytes>,
    ) -> Result<Project, UploadError> {
        let logo = logo
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| UploadError::validation("`logo` image is required"))?;

        let batch = self.normalizer.normalize_batch(logo, gallery).await?;
        let draft = ProjectDraft {
            fields,
            logo: batch.logo.bytes,
            uiux_images: batch.gallery.into_iter().map(|image| image.bytes).collect(),
        };

        let project = self.store.create(draft).await?;
        info!(
            target = "folio::projects",
            project_id = %project.id,
            gallery = project.uiux_images.len(),
            "project uploaded"
        );
        Ok(project)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.store.delete(id).await
    }
}
