//! Cache-aware entity store.
//!
//! One facade serves every entity kind. The [`CachePolicy`] it is built with
//! decides the list key, its TTL and which writes drop the cached list. The
//! cache itself never learns what it holds.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::application::repos::{EntityRepo, RepoError};
use crate::cache::{CachePolicy, CachedValue, SharedCache};
use crate::domain::entities::Entity;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct EntityStore<E: Entity> {
    repo: Arc<dyn EntityRepo<E>>,
    cache: Arc<SharedCache>,
    policy: CachePolicy,
}

impl<E: Entity> Clone for EntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            cache: self.cache.clone(),
            policy: self.policy,
        }
    }
}

impl<E: Entity> EntityStore<E> {
    pub fn new(repo: Arc<dyn EntityRepo<E>>, cache: Arc<SharedCache>, policy: CachePolicy) -> Self {
        Self {
            repo,
            cache,
            policy,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Every stored record, served from cache while the list is fresh.
    pub async fn list(&self) -> Result<Arc<Vec<E>>, StoreError> {
        if let Some(cached) = self.cache.get(self.policy.key) {
            match cached.downcast::<Vec<E>>() {
                Ok(list) => return Ok(list),
                Err(_) => debug!(
                    target = "folio::catalog",
                    key = self.policy.key,
                    entity = E::NAME,
                    "cached value has unexpected type; reloading"
                ),
            }
        }

        let list = Arc::new(self.repo.list_all().await?);
        let value: CachedValue = list.clone();
        self.cache.put(self.policy.key, value, self.policy.ttl);
        Ok(list)
    }

    pub async fn create(&self, draft: E::Draft) -> Result<E, StoreError> {
        let record = self.repo.insert(draft).await?;
        if self.policy.invalidate_on_create {
            self.cache.invalidate(self.policy.key);
        }
        debug!(
            target = "folio::catalog",
            entity = E::NAME,
            id = %record.id(),
            "record created"
        );
        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        if !self.repo.delete(id).await? {
            return Err(StoreError::NotFound { entity: E::NAME });
        }
        if self.policy.invalidate_on_delete {
            self.cache.invalidate(self.policy.key);
        }
        debug!(target = "folio::catalog", entity = E::NAME, id = %id, "record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use time::OffsetDateTime;

    use super::*;
    use crate::domain::entities::{Review, ReviewDraft};

    #[derive(Default)]
    struct CountingRepo {
        rows: Mutex<Vec<Review>>,
        list_calls: AtomicUsize,
        fail_list: bool,
    }

    #[async_trait]
    impl EntityRepo<Review> for CountingRepo {
        async fn insert(&self, draft: ReviewDraft) -> Result<Review, RepoError> {
            let review = Review::materialize(draft, Uuid::new_v4(), OffsetDateTime::now_utc());
            self.rows.lock().unwrap().push(review.clone());
            Ok(review)
        }

        async fn list_all(&self) -> Result<Vec<Review>, RepoError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list {
                return Err(RepoError::from_persistence("store offline"));
            }
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|row| row.id != id);
            Ok(rows.len() != before)
        }
    }

    fn draft(text: &str) -> ReviewDraft {
        ReviewDraft::new(Some(text.into()), Some("Ada".into()), Some(4.0)).unwrap()
    }

    fn cache() -> Arc<SharedCache> {
        Arc::new(SharedCache::with_capacity(NonZeroUsize::new(8).unwrap()))
    }

    fn store(repo: Arc<CountingRepo>, policy: CachePolicy) -> EntityStore<Review> {
        EntityStore::new(repo, cache(), policy)
    }

    #[tokio::test(start_paused = true)]
    async fn second_list_within_ttl_skips_the_store() {
        let repo = Arc::new(CountingRepo::default());
        let store = store(repo.clone(), CachePolicy::REVIEWS);

        store.list().await.unwrap();
        store.list().await.unwrap();
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        store.list().await.unwrap();
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn create_without_invalidation_serves_stale_list() {
        let repo = Arc::new(CountingRepo::default());
        let store = store(repo.clone(), CachePolicy::REVIEWS);

        assert!(store.list().await.unwrap().is_empty());
        store.create(draft("late")).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_with_invalidation_refreshes_list() {
        let repo = Arc::new(CountingRepo::default());
        let policy = CachePolicy {
            invalidate_on_delete: true,
            ..CachePolicy::REVIEWS
        };
        let store = store(repo.clone(), policy);

        let created = store.create(draft("gone soon")).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);

        store.delete(created.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found() {
        let store = store(Arc::new(CountingRepo::default()), CachePolicy::REVIEWS);
        let err = store.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "review" }));
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let repo = Arc::new(CountingRepo {
            fail_list: true,
            ..Default::default()
        });
        let store = store(repo.clone(), CachePolicy::REVIEWS);

        assert!(matches!(store.list().await, Err(StoreError::Repo(_))));
        assert!(store.list().await.is_err());
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn foreign_value_under_key_counts_as_miss() {
        let repo = Arc::new(CountingRepo::default());
        let shared = cache();
        shared.put(
            CachePolicy::REVIEWS.key,
            Arc::new("not a list") as CachedValue,
            Duration::from_secs(60),
        );
        let store = EntityStore::new(repo.clone(), shared, CachePolicy::REVIEWS);

        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 1);
    }
}
