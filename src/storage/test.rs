use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::storage::{ImageStorage, StorageError, StorageResult, public_url};

pub const TEST_BUCKET: &str = "product-images";
pub const TEST_BASE_URL: &str = "http://localhost:8080";

/// In-memory bucket used by unit tests.
#[derive(Default)]
pub struct TestImageStorage {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    removed: Mutex<Vec<String>>,
    uploads: Mutex<usize>,
    fail_upload_at: Option<usize>,
    fail_remove: bool,
}

impl TestImageStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`-th upload (1-based) with an I/O error.
    pub fn failing_upload_at(mut self, n: usize) -> Self {
        self.fail_upload_at = Some(n);
        self
    }

    pub fn failing_remove(mut self) -> Self {
        self.fail_remove = true;
        self
    }

    /// Seed an object without counting it as an upload.
    pub fn with_object(self, object_name: &str) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert(object_name.to_string(), Vec::new());
        self
    }

    pub fn url_for(object_name: &str) -> String {
        public_url(TEST_BASE_URL, TEST_BUCKET, object_name)
    }

    pub fn object_names(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        *self.uploads.lock().unwrap()
    }
}

impl ImageStorage for TestImageStorage {
    fn bucket(&self) -> &str {
        TEST_BUCKET
    }

    fn upload(
        &self,
        object_name: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> StorageResult<String> {
        let attempt = {
            let mut uploads = self.uploads.lock().unwrap();
            *uploads += 1;
            *uploads
        };

        if self.fail_upload_at == Some(attempt) {
            return Err(StorageError::Io(std::io::Error::other("upload rejected")));
        }

        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(object_name) {
            return Err(StorageError::AlreadyExists(object_name.to_string()));
        }
        objects.insert(object_name.to_string(), bytes.to_vec());

        Ok(Self::url_for(object_name))
    }

    fn remove(&self, object_paths: &[String]) -> StorageResult<()> {
        self.removed
            .lock()
            .unwrap()
            .extend(object_paths.iter().cloned());

        if self.fail_remove {
            return Err(StorageError::PartialRemoval {
                failed: object_paths.len(),
                total: object_paths.len(),
            });
        }

        let mut objects = self.objects.lock().unwrap();
        for path in object_paths {
            objects.remove(path);
        }

        Ok(())
    }
}
