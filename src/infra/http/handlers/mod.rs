//! Route handlers, one module per endpoint family.

pub mod admin;
pub mod contacts;
pub mod projects;
pub mod reviews;
pub mod skills;

use uuid::Uuid;

/// Ids that are not UUIDs cannot name a stored record.
pub(super) fn parse_record_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
