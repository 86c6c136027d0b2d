//! Site owner lookup and admin token verification.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::info;

use crate::application::error::AdminError;
use crate::application::repos::AdminRepo;
use crate::domain::entities::AdminRecord;
use crate::domain::error::DomainError;

#[derive(Clone)]
pub struct AdminService {
    repo: Arc<dyn AdminRepo>,
}

impl AdminService {
    pub fn new(repo: Arc<dyn AdminRepo>) -> Self {
        Self { repo }
    }

    /// Email of the first admin record.
    pub async fn admin_email(&self) -> Result<String, AdminError> {
        self.repo
            .first_admin()
            .await?
            .map(|admin| admin.email)
            .ok_or(AdminError::NotFound)
    }

    /// Create the admin record, or return the existing one for `email`.
    pub async fn seed_admin(&self, email: &str) -> Result<AdminRecord, AdminError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("admin email must be an address").into());
        }
        let record = self.repo.upsert_admin(email).await?;
        info!(target = "folio::admin", admin_id = %record.id, "admin record seeded");
        Ok(record)
    }
}

/// Checks bearer tokens against a configured SHA-256 digest.
#[derive(Debug, Clone, Default)]
pub struct AdminTokenVerifier {
    expected: Option<[u8; 32]>,
}

impl AdminTokenVerifier {
    /// `digest_hex` is the lowercase or uppercase hex of SHA-256(token).
    /// An unparsable digest leaves the verifier locked.
    pub fn from_hex(digest_hex: Option<&str>) -> Self {
        let expected = digest_hex
            .and_then(|hex_value| hex::decode(hex_value.trim()).ok())
            .and_then(|bytes| <[u8; 32]>::try_from(bytes.as_slice()).ok());
        Self { expected }
    }

    pub fn is_configured(&self) -> bool {
        self.expected.is_some()
    }

    pub fn verify(&self, token: &str) -> bool {
        let Some(expected) = self.expected.as_ref() else {
            return false;
        };
        let digest = Sha256::digest(token.as_bytes());
        bool::from(digest.as_slice().ct_eq(expected.as_slice()))
    }
}
