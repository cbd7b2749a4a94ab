//! Object storage for product images.
//!
//! Images live in a single bucket and are addressed by public URLs of the form
//! `{base}/storage/v1/object/public/{bucket}/{object}`. The database only keeps
//! those URLs, so every storage operation starts from a URL and derives the
//! object path from the segment that follows the bucket name.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::image::ImageUpload;

pub mod local;

#[cfg(test)]
pub mod test;

/// URL prefix under which bucket objects are publicly served.
pub const PUBLIC_OBJECT_PREFIX: &str = "/storage/v1/object/public";

#[derive(Debug, Error)]
pub enum StorageError {
    /// Uploads never overwrite existing objects.
    #[error("object `{0}` already exists")]
    AlreadyExists(String),
    #[error("invalid object path `{0}`")]
    InvalidPath(String),
    #[error("failed to remove {failed} of {total} objects")]
    PartialRemoval { failed: usize, total: usize },
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Bucket holding product images.
pub trait ImageStorage {
    /// Name of the bucket; also the URL segment that precedes object paths.
    fn bucket(&self) -> &str;
    /// Store a new object and return its public URL. Fails if the object exists.
    fn upload(&self, object_name: &str, bytes: &[u8], content_type: &str)
    -> StorageResult<String>;
    /// Remove the given objects, attempting every path even if some fail.
    fn remove(&self, object_paths: &[String]) -> StorageResult<()>;
}

/// Build the public URL of `object_name` in `bucket`.
pub fn public_url(base_url: &str, bucket: &str, object_name: &str) -> String {
    format!(
        "{}{PUBLIC_OBJECT_PREFIX}/{bucket}/{object_name}",
        base_url.trim_end_matches('/')
    )
}

/// Derive the object path from a public URL.
///
/// Returns everything after the first path segment equal to `bucket`, or `None`
/// when the URL does not contain the bucket segment or nothing follows it.
pub fn object_path_for_url(url: &str, bucket: &str) -> Option<String> {
    let segments: Vec<&str> = url.split('/').collect();
    let bucket_index = segments.iter().position(|segment| *segment == bucket)?;
    let rest = &segments[bucket_index + 1..];

    if rest.is_empty() || rest.iter().all(|segment| segment.is_empty()) {
        return None;
    }

    Some(rest.join("/"))
}

/// Generate a collision-resistant object name for an upload.
pub fn new_object_name(upload: &ImageUpload) -> String {
    format!("{}.{}", Uuid::new_v4(), upload.extension())
}
