use std::sync::Arc;

use tracing::{info, warn};

use crate::application::catalog::StoreError;
use crate::application::error::SubmissionError;
use crate::application::notify::{Notification, Notifier};
use crate::application::repos::EntityRepo;
use crate::domain::entities::{Contact, ContactDraft};

/// Contact inquiries are write-only and never cached.
#[derive(Clone)]
pub struct ContactService {
    repo: Arc<dyn EntityRepo<Contact>>,
    notifier: Arc<dyn Notifier>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn EntityRepo<Contact>>, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    pub async fn create(
        &self,
        query: Option<String>,
        email: Option<String>,
        contact: Option<String>,
    ) -> Result<Contact, SubmissionError> {
        let draft = ContactDraft::new(query, email, contact)?;
        let record = self
            .repo
            .insert(draft)
            .await
            .map_err(StoreError::from)?;

        let notification =
            Notification::contact_submitted(&record.query, &record.email, &record.contact);
        if let Err(err) = self.notifier.dispatch(notification).await {
            warn!(
                target = "folio::contacts",
                contact_id = %record.id,
                error = %err,
                "contact stored but owner notification failed"
            );
            return Err(SubmissionError::Notify(err));
        }

        info!(target = "folio::contacts", contact_id = %record.id, "contact saved");
        Ok(record)
    }
}
