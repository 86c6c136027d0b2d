use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::application::catalog::{EntityStore, StoreError};
use crate::application::error::SubmissionError;
use crate::application::notify::{Notification, Notifier};
use crate::domain::entities::{Review, ReviewDraft};

#[derive(Clone)]
pub struct ReviewService {
    store: EntityStore<Review>,
    notifier: Arc<dyn Notifier>,
}

impl ReviewService {
    pub fn new(store: EntityStore<Review>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn list(&self) -> Result<Arc<Vec<Review>>, StoreError> {
        self.store.list().await
    }

    /// Persist a review, then tell the owner. The review stays stored when mail fails.
    pub async fn create(
        &self,
        text: Option<String>,
        name: Option<String>,
        rating: Option<f64>,
    ) -> Result<Review, SubmissionError> {
        let draft = ReviewDraft::new(text, name, rating)?;
        let review = self.store.create(draft).await?;

        let notification = Notification::review_submitted(&review.text, &review.name, review.rating);
        if let Err(err) = self.notifier.dispatch(notification).await {
            warn!(
                target = "folio::reviews",
                review_id = %review.id,
                error = %err,
                "review stored but owner notification failed"
            );
            return Err(SubmissionError::Notify(err));
        }

        info!(target = "folio::reviews", review_id = %review.id, "review submitted");
        Ok(review)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.store.delete(id).await
    }
}
