//! In-process repositories used when no database is configured, and by tests.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::application::repos::{AdminRepo, EntityRepo, HealthRepo, RepoError};
use crate::domain::entities::{AdminRecord, Contact, Entity, Project, Review, Skill};

struct Table<E> {
    rows: RwLock<Vec<E>>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<E: Clone> Table<E> {
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<E>> {
        self.rows.read().unwrap_or_else(|poisoned| {
            warn!(target = "folio::memory", "recovering poisoned table lock");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<E>> {
        self.rows.write().unwrap_or_else(|poisoned| {
            warn!(target = "folio::memory", "recovering poisoned table lock");
            poisoned.into_inner()
        })
    }
}

#[derive(Clone, Default)]
pub struct MemoryRepositories {
    reviews: Arc<Table<Review>>,
    contacts: Arc<Table<Contact>>,
    projects: Arc<Table<Project>>,
    skills: Arc<Table<Skill>>,
    admins: Arc<Table<AdminRecord>>,
}

impl MemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    fn table<E: Entity>(&self) -> &Table<E>
    where
        Self: TableFor<E>,
    {
        <Self as TableFor<E>>::table_ref(self)
    }

    async fn insert_into<E: Entity>(&self, draft: E::Draft) -> Result<E, RepoError>
    where
        Self: TableFor<E>,
    {
        let record = E::materialize(draft, Uuid::new_v4(), OffsetDateTime::now_utc());
        self.table::<E>().write().push(record.clone());
        Ok(record)
    }

    async fn list_from<E: Entity>(&self) -> Result<Vec<E>, RepoError>
    where
        Self: TableFor<E>,
    {
        Ok(self.table::<E>().read().clone())
    }

    async fn delete_from<E: Entity>(&self, id: Uuid) -> Result<bool, RepoError>
    where
        Self: TableFor<E>,
    {
        let mut rows = self.table::<E>().write();
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        Ok(rows.len() != before)
    }
}

trait TableFor<E> {
    fn table_ref(&self) -> &Table<E>;
}

macro_rules! memory_entity_repo {
    ($entity:ty, $field:ident) => {
        impl TableFor<$entity> for MemoryRepositories {
            fn table_ref(&self) -> &Table<$entity> {
                &self.$field
            }
        }

        #[async_trait]
        impl EntityRepo<$entity> for MemoryRepositories {
            async fn insert(
                &self,
                draft: <$entity as Entity>::Draft,
            ) -> Result<$entity, RepoError> {
                self.insert_into::<$entity>(draft).await
            }

            async fn list_all(&self) -> Result<Vec<$entity>, RepoError> {
                self.list_from::<$entity>().await
            }

            async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
                self.delete_from::<$entity>(id).await
            }
        }
    };
}

memory_entity_repo!(Review, reviews);
memory_entity_repo!(Contact, contacts);
memory_entity_repo!(Project, projects);
memory_entity_repo!(Skill, skills);

#[async_trait]
impl AdminRepo for MemoryRepositories {
    async fn first_admin(&self) -> Result<Option<AdminRecord>, RepoError> {
        Ok(self.admins.read().first().cloned())
    }

    async fn upsert_admin(&self, email: &str) -> Result<AdminRecord, RepoError> {
        let mut admins = self.admins.write();
        if let Some(existing) = admins.iter().find(|admin| admin.email == email) {
            return Ok(existing.clone());
        }
        let record = AdminRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: None,
            created_at: OffsetDateTime::now_utc(),
        };
        admins.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl HealthRepo for MemoryRepositories {
    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}
