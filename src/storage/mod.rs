//! Attachment storage.
//!
//! The quote engine only ever sees opaque references. Bytes go through
//! [`AttachmentStore::store`] after [`validate_upload`] has accepted them, and
//! come back out as short-lived signed URLs.

pub mod supabase;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use supabase::SupabaseStorage;

/// Largest accepted upload (5 MiB).
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// Prefix quote attachments are uploaded under. Vendor responses may only
/// reference objects below it.
pub const QUOTE_ATTACHMENT_PREFIX: &str = "quotes";

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "pdf"];

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("{0}")]
    InvalidAttachment(String),
    #[error("Upload failed: {0}")]
    UploadFailed(String),
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

/// A file received from a client, not yet stored.
#[derive(Debug, Clone)]
pub struct Upload {
    pub content: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Store `upload` under `prefix` and return its reference.
    async fn store(&self, upload: Upload, prefix: &str) -> Result<String, AttachmentError>;

    /// Produce a time-limited retrieval URL for a stored reference.
    async fn sign(&self, reference: &str) -> Result<String, AttachmentError>;
}

fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

fn check_extension(name: &str) -> Result<String, AttachmentError> {
    match extension_of(name) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(ext),
        _ => Err(AttachmentError::InvalidAttachment(
            "Invalid file type. Only JPG, PNG, WEBP, and PDF allowed.".to_string(),
        )),
    }
}

/// Check size and extension before anything leaves the process.
/// Returns the normalized (lowercase) extension.
pub fn validate_upload(upload: &Upload) -> Result<String, AttachmentError> {
    if upload.content.is_empty() {
        return Err(AttachmentError::InvalidAttachment(
            "Bad request: No file provided".to_string(),
        ));
    }
    if upload.content.len() > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::InvalidAttachment(
            "File too large (max 5MB)".to_string(),
        ));
    }
    check_extension(&upload.filename)
}

/// Validate a reference supplied by a client on a vendor response. It must
/// name an object below [`QUOTE_ATTACHMENT_PREFIX`].
pub fn validate_reference(reference: &str) -> Result<(), AttachmentError> {
    let reference = reference.trim();
    let in_quote_area = reference
        .strip_prefix(QUOTE_ATTACHMENT_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|rest| !rest.is_empty());
    if !in_quote_area || reference.contains("..") {
        return Err(AttachmentError::InvalidAttachment(
            "Invalid attachment reference".to_string(),
        ));
    }
    check_extension(reference).map(|_| ())
}

/// Logical prefixes are plain path segments: `[a-z0-9_-]` separated by `/`.
pub fn validate_prefix(prefix: &str) -> Result<(), AttachmentError> {
    let ok = !prefix.is_empty()
        && prefix.split('/').all(|seg| {
            !seg.is_empty()
                && seg
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        });
    if ok {
        Ok(())
    } else {
        Err(AttachmentError::InvalidAttachment(format!(
            "Invalid upload prefix '{prefix}'"
        )))
    }
}

/// Object key for a new upload: `<prefix>/<uuid>.<ext>`.
pub fn object_key(prefix: &str, ext: &str) -> String {
    format!("{}/{}.{ext}", prefix.trim_end_matches('/'), Uuid::new_v4())
}
