use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::application::catalog::{EntityStore, StoreError};
use crate::application::error::UploadError;
use crate::domain::entities::{Skill, SkillDraft, SkillFields};

#[derive(Clone)]
pub struct SkillService {
    store: EntityStore<Skill>,
}

impl SkillService {
    pub fn new(store: EntityStore<Skill>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Arc<Vec<Skill>>, StoreError> {
        self.store.list().await
    }

    /// Icons are stored exactly as uploaded; only project images are normalized.
    pub async fn create(
        &self,
        fields: SkillFields,
        icon: Option<Bytes>,
    ) -> Result<Skill, UploadError> {
        let icon = icon
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| UploadError::validation("`icon` image is required"))?;

        let skill = self.store.create(SkillDraft { fields, icon }).await?;
        info!(target = "folio::skills", skill_id = %skill.id, "skill uploaded");
        Ok(skill)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.store.delete(id).await
    }
}
