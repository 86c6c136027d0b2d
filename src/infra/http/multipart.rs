//! Multipart upload form parsing with per-file limits.

use std::collections::HashMap;

use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use tracing::warn;

use crate::application::error::UploadError;

const SOURCE: &str = "folio::http::multipart";

/// A file field the form accepts and how many parts it may carry.
#[derive(Debug, Clone, Copy)]
pub struct FileSlot {
    pub name: &'static str,
    pub max_count: usize,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    texts: HashMap<String, String>,
    files: HashMap<&'static str, Vec<Bytes>>,
}

impl UploadForm {
    /// Trimmed text value; empty strings read as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.texts
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub fn take_first(&mut self, name: &str) -> Option<Bytes> {
        self.files
            .get_mut(name)
            .and_then(|parts| (!parts.is_empty()).then(|| parts.remove(0)))
    }

    pub fn take_all(&mut self, name: &str) -> Vec<Bytes> {
        self.files.remove(name).unwrap_or_default()
    }
}

/// Read every part of `multipart`. Files larger than `max_file_bytes` and
/// slots over their count are rejected; unknown text fields are kept, unknown
/// file fields are ignored.
pub async fn read_upload_form(
    multipart: &mut Multipart,
    slots: &[FileSlot],
    max_file_bytes: usize,
) -> Result<UploadForm, UploadError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(slot) = slots.iter().find(|slot| slot.name == name) {
            let parts = form.files.entry(slot.name).or_default();
            if parts.len() >= slot.max_count {
                return Err(UploadError::validation(format!(
                    "`{}` accepts at most {} file(s)",
                    slot.name, slot.max_count
                )));
            }
            let bytes = read_limited(field, slot.name, max_file_bytes).await?;
            parts.push(bytes);
        } else if field.file_name().is_some() {
            warn!(target = SOURCE, field = %name, "ignoring unexpected file field");
        } else {
            let value = field.text().await.map_err(map_multipart_error)?;
            form.texts.insert(name, value);
        }
    }

    Ok(form)
}

async fn read_limited(
    mut field: Field<'_>,
    name: &str,
    limit: usize,
) -> Result<Bytes, UploadError> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(map_multipart_error)? {
        if buffer.len() + chunk.len() > limit {
            return Err(UploadError::PayloadTooLarge {
                field: name.to_string(),
                limit,
            });
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}

fn map_multipart_error(err: MultipartError) -> UploadError {
    let status = err.status();
    warn!(
        target = SOURCE,
        status = status.as_u16(),
        error = %err,
        "failed to read multipart payload"
    );
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::RequestTooLarge
    } else {
        UploadError::validation(format!("malformed multipart body: {}", err.body_text()))
    }
}
