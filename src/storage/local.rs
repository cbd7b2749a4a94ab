use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use crate::storage::{ImageStorage, StorageError, StorageResult, public_url};

/// Bucket stored as a directory on the local filesystem.
///
/// Objects are served by the web server under
/// [`PUBLIC_OBJECT_PREFIX`](crate::storage::PUBLIC_OBJECT_PREFIX), so the
/// URLs returned by [`ImageStorage::upload`] are directly fetchable.
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    bucket_dir: PathBuf,
    bucket: String,
    public_base_url: String,
}

impl LocalImageStorage {
    /// Open (creating if needed) the bucket directory `root/bucket`.
    pub fn new(
        root: impl AsRef<Path>,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> StorageResult<Self> {
        let bucket = bucket.into();
        if !is_valid_relative_path(&bucket) || bucket.contains('/') {
            return Err(StorageError::InvalidPath(bucket));
        }

        let bucket_dir = root.as_ref().join(&bucket);
        fs::create_dir_all(&bucket_dir)?;

        Ok(Self {
            bucket_dir,
            bucket,
            public_base_url: public_base_url.into(),
        })
    }

    /// Directory holding the bucket objects.
    pub fn bucket_dir(&self) -> &Path {
        &self.bucket_dir
    }

    fn object_file(&self, object_path: &str) -> StorageResult<PathBuf> {
        if !is_valid_relative_path(object_path) {
            return Err(StorageError::InvalidPath(object_path.to_string()));
        }
        Ok(self.bucket_dir.join(object_path))
    }
}

/// Accept only non-empty relative paths made of normal components.
fn is_valid_relative_path(path: &str) -> bool {
    !path.is_empty()
        && !path.contains('\\')
        && Path::new(path)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

impl ImageStorage for LocalImageStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn upload(
        &self,
        object_name: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.object_file(object_name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(object_name.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        if let Err(err) = file.write_all(bytes).and_then(|()| file.sync_all()) {
            fs::remove_file(&path).ok();
            return Err(err.into());
        }

        Ok(public_url(&self.public_base_url, &self.bucket, object_name))
    }

    fn remove(&self, object_paths: &[String]) -> StorageResult<()> {
        let mut failed = 0;

        for object_path in object_paths {
            let result = self
                .object_file(object_path)
                .and_then(|path| fs::remove_file(path).map_err(StorageError::from));

            match result {
                Ok(()) => {}
                Err(StorageError::Io(err)) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    log::warn!("Failed to remove stored object `{object_path}`: {err}");
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(StorageError::PartialRemoval {
                failed,
                total: object_paths.len(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &tempfile::TempDir) -> LocalImageStorage {
        LocalImageStorage::new(dir.path(), "product-images", "http://localhost:8080")
            .expect("open bucket")
    }

    #[test]
    fn upload_writes_object_and_returns_public_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage(&dir);

        let url = storage
            .upload("a.png", b"png-bytes", "image/png")
            .expect("upload");

        assert_eq!(
            url,
            "http://localhost:8080/storage/v1/object/public/product-images/a.png"
        );
        let stored = fs::read(storage.bucket_dir().join("a.png")).expect("read object");
        assert_eq!(stored, b"png-bytes");
    }

    #[test]
    fn upload_never_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage(&dir);

        storage.upload("a.png", b"first", "image/png").expect("upload");
        let err = storage
            .upload("a.png", b"second", "image/png")
            .expect_err("duplicate upload must fail");

        assert!(matches!(err, StorageError::AlreadyExists(name) if name == "a.png"));
        let stored = fs::read(storage.bucket_dir().join("a.png")).expect("read object");
        assert_eq!(stored, b"first");
    }

    #[test]
    fn rejects_paths_escaping_the_bucket() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage(&dir);

        assert!(matches!(
            storage.upload("../evil.png", b"x", "image/png"),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            storage.remove(&["../../etc/passwd".to_string()]),
            Err(StorageError::PartialRemoval { failed: 1, total: 1 })
        ));
    }

    #[test]
    fn remove_deletes_objects_and_ignores_missing_ones() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage(&dir);
        storage.upload("a.png", b"a", "image/png").expect("upload");

        storage
            .remove(&["a.png".to_string(), "missing.png".to_string()])
            .expect("remove");

        assert!(!storage.bucket_dir().join("a.png").exists());
    }
}
