//! Reconciliation of a product's stored images with a client edit.

use std::collections::HashSet;

use crate::domain::image::ImageUpload;
use crate::services::{ServiceError, ServiceResult};
use crate::storage::{ImageStorage, new_object_name, object_path_for_url};

/// Outcome of diffing the stored images against the retained set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePlan {
    /// URLs the client kept, in the client's order.
    pub retained: Vec<String>,
    /// Previously stored URLs no longer referenced.
    pub to_delete: Vec<String>,
}

impl ImagePlan {
    /// Final image list once `new_urls` have been uploaded.
    pub fn final_images(&self, new_urls: &[String]) -> Vec<String> {
        self.retained.iter().chain(new_urls).cloned().collect()
    }
}

/// Compute which stored images survive an edit.
///
/// The retained list is kept exactly as submitted, including URLs that were
/// never stored for the product. Only previously stored URLs absent from it
/// are scheduled for deletion, compared by exact string equality.
pub fn plan_image_changes(previous: &[String], retained: &[String]) -> ImagePlan {
    let kept: HashSet<&str> = retained.iter().map(String::as_str).collect();
    let mut deleted = HashSet::new();
    let to_delete = previous
        .iter()
        .filter(|url| !kept.contains(url.as_str()) && deleted.insert(url.as_str()))
        .cloned()
        .collect();

    ImagePlan {
        retained: retained.to_vec(),
        to_delete,
    }
}

/// Upload every image under a fresh object name, returning public URLs in order.
///
/// On failure the objects already uploaded by this call are removed again and
/// `UploadFailed` is returned.
pub fn upload_images<S>(storage: &S, uploads: &[ImageUpload]) -> ServiceResult<Vec<String>>
where
    S: ImageStorage + ?Sized,
{
    let mut urls = Vec::with_capacity(uploads.len());

    for upload in uploads {
        let object_name = new_object_name(upload);
        match storage.upload(&object_name, &upload.bytes, &upload.content_type) {
            Ok(url) => urls.push(url),
            Err(err) => {
                log::error!("Failed to upload image {object_name}: {err}");
                remove_images_best_effort(storage, &urls);
                return Err(ServiceError::UploadFailed(err.to_string()));
            }
        }
    }

    Ok(urls)
}

/// Delete the objects behind `urls`, logging instead of failing.
///
/// URLs that do not point into the bucket are skipped.
pub fn remove_images_best_effort<S>(storage: &S, urls: &[String])
where
    S: ImageStorage + ?Sized,
{
    let paths: Vec<String> = urls
        .iter()
        .filter_map(|url| {
            let path = object_path_for_url(url, storage.bucket());
            if path.is_none() {
                log::warn!("Skipping image outside bucket {}: {url}", storage.bucket());
            }
            path
        })
        .collect();

    if paths.is_empty() {
        return;
    }

    if let Err(err) = storage.remove(&paths) {
        log::warn!("Storage cleanup failed for {} object(s): {err}", paths.len());
    }
}
