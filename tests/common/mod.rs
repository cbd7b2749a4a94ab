//! Helpers for integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::db::{DbPool, establish_connection_pool};
use tempfile::TempDir;

use pushkind_storefront::domain::image::ImageUpload;
use pushkind_storefront::storage::local::LocalImageStorage;
use pushkind_storefront::storage::{ImageStorage, StorageError, StorageResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

pub const TEST_BUCKET: &str = "product-images";
pub const TEST_BASE_URL: &str = "http://localhost:8080";

/// Temporary database used in integration tests.
///
/// Field order matters: the pool closes before the directory is removed.
pub struct TestDb {
    pool: DbPool,
    path: PathBuf,
    dir: TempDir,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory.");
        let path = dir.path().join(filename);
        let database_url = path.to_str().expect("UTF-8 temp path").to_string();

        let pool =
            establish_connection_pool(&database_url).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb { pool, path, dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filesystem bucket living next to the database.
    pub fn storage(&self) -> LocalImageStorage {
        LocalImageStorage::new(self.dir.path().join("storage"), TEST_BUCKET, TEST_BASE_URL)
            .expect("Failed to open bucket.")
    }
}

/// Wraps a real bucket, recording removals and optionally failing the n-th upload.
pub struct ObservedStorage {
    inner: LocalImageStorage,
    fail_upload_at: Option<usize>,
    uploads: AtomicUsize,
    removed: Mutex<Vec<String>>,
}

impl ObservedStorage {
    pub fn new(inner: LocalImageStorage) -> Self {
        Self {
            inner,
            fail_upload_at: None,
            uploads: AtomicUsize::new(0),
            removed: Mutex::new(Vec::new()),
        }
    }

    /// Make the `n`-th upload (1-based) from now on fail.
    pub fn failing_upload_at(mut self, n: usize) -> Self {
        self.fail_upload_at = Some(self.uploads.load(Ordering::SeqCst) + n);
        self
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().expect("lock").clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Names of the objects currently stored in the bucket.
    pub fn stored_objects(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.inner.bucket_dir())
            .expect("read bucket")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl ImageStorage for ObservedStorage {
    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    fn upload(&self, object_name: &str, bytes: &[u8], content_type: &str) -> StorageResult<String> {
        let attempt = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_upload_at == Some(attempt) {
            return Err(StorageError::Io(std::io::Error::other("bucket unavailable")));
        }
        self.inner.upload(object_name, bytes, content_type)
    }

    fn remove(&self, object_paths: &[String]) -> StorageResult<()> {
        self.removed
            .lock()
            .expect("lock")
            .extend(object_paths.iter().cloned());
        self.inner.remove(object_paths)
    }
}

pub fn png(name: &str) -> ImageUpload {
    ImageUpload::new(
        Some(format!("{name}.png")),
        "image/png",
        format!("fake png {name}").into_bytes(),
    )
}
