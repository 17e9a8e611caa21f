// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON document storage on the local filesystem.
//!
//! Every document is a single JSON file. Writes go to a temp file first and
//! are renamed into place, so a reader never observes a half-written
//! document. Cross-document consistency is the job of the repositories.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use super::StoragePaths;

/// Error type for document storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Document not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// Document already exists (or a unique field is taken)
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    /// Storage not initialized
    #[error("Storage not initialized")]
    NotInitialized,
    /// Read-back did not match what was written
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),
    /// Ownership check failed
    #[error("Permission denied: user {user_id} cannot modify {resource}")]
    PermissionDenied { user_id: String, resource: String },
    /// A lock guarding the store was poisoned by a panicking writer
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Filesystem-backed JSON document store.
#[derive(Debug, Clone)]
pub struct DocumentStorage {
    paths: StoragePaths,
    initialized: bool,
}

impl DocumentStorage {
    /// Create a new DocumentStorage instance.
    ///
    /// Does NOT initialize the directory structure. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Check if storage is initialized.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Initialize the collection directories.
    ///
    /// Safe to call multiple times (idempotent).
    pub fn initialize(&mut self) -> StorageResult<()> {
        let dirs = [self.paths.users_dir(), self.paths.tweets_dir()];

        for dir in dirs {
            fs::create_dir_all(&dir)?;
        }

        self.initialized = true;
        Ok(())
    }

    /// Write-read-delete probe against the data directory.
    pub fn health_check(&self) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        // One file per probe so concurrent probes never delete each other's.
        let test_file = self
            .paths
            .root()
            .join(format!(".health_check-{}", Uuid::new_v4()));
        let test_data = b"health_check_data";

        fs::write(&test_file, test_data)?;
        let read_data = fs::read(&test_file)?;
        fs::remove_file(&test_file)?;

        if read_data != test_data {
            return Err(StorageError::IntegrityViolation(
                "Health check data mismatch".to_string(),
            ));
        }

        Ok(())
    }

    // ========== Generic JSON Operations ==========

    /// Read a JSON document and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
            _ => StorageError::Io(e),
        })?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)?;
        Ok(value)
    }

    /// Write a JSON document (atomic write via rename).
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Check if a document exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    /// Delete a document.
    pub fn delete(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }
        fs::remove_file(path.as_ref())?;
        Ok(())
    }

    /// List the ids (file stems) of all documents in a collection directory.
    pub fn list_files(&self, dir: impl AsRef<Path>, extension: &str) -> StorageResult<Vec<String>> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != extension) {
                continue;
            }
            if let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(id.to_string());
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    fn test_storage() -> (DocumentStorage, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut storage = DocumentStorage::new(StoragePaths::new(temp_dir.path()));
        storage.initialize().expect("Failed to initialize test storage");
        (storage, temp_dir)
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        id: String,
        value: i32,
    }

    #[test]
    fn initialize_creates_directories() {
        let (storage, _dir) = test_storage();

        assert!(storage.paths().users_dir().exists());
        assert!(storage.paths().tweets_dir().exists());
        assert!(storage.is_initialized());
    }

    #[test]
    fn write_and_read_json() {
        let (storage, _dir) = test_storage();
        let data = TestData {
            id: "test-1".to_string(),
            value: 42,
        };

        let path = storage.paths().tweet("test-1");
        storage.write_json(&path, &data).unwrap();

        let read: TestData = storage.read_json(&path).unwrap();
        assert_eq!(read, data);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn reading_missing_document_is_not_found() {
        let (storage, _dir) = test_storage();

        let result = storage.read_json::<TestData>(storage.paths().user("nobody"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn health_check_works() {
        let (storage, _dir) = test_storage();
        storage.health_check().expect("Health check should pass");
    }

    #[test]
    fn concurrent_health_checks_all_pass() {
        let (storage, dir) = test_storage();
        let storage = std::sync::Arc::new(storage);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let storage = std::sync::Arc::clone(&storage);
                std::thread::spawn(move || {
                    (0..50).filter(|_| storage.health_check().is_err()).count()
                })
            })
            .collect();
        let failures: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(failures, 0);
        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter(|entry| {
                entry.as_ref().unwrap().file_name().to_string_lossy().starts_with(".health_check")
            })
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn io_not_found_outside_reads_is_an_io_error() {
        let err = StorageError::from(io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, StorageError::Io(_)));

        let (storage, _dir) = test_storage();
        assert!(matches!(
            storage.delete(storage.paths().tweet("never-written")),
            Err(StorageError::Io(_))
        ));
    }

    #[test]
    fn list_files_returns_ids() {
        let (storage, _dir) = test_storage();

        for i in 1..=3 {
            storage
                .write_json(
                    storage.paths().user(&format!("u-{i}")),
                    &TestData {
                        id: format!("u-{i}"),
                        value: i,
                    },
                )
                .unwrap();
        }

        let mut ids = storage.list_files(storage.paths().users_dir(), "json").unwrap();
        ids.sort();
        assert_eq!(ids, vec!["u-1", "u-2", "u-3"]);
    }

    #[test]
    fn delete_file_removes_it() {
        let (storage, _dir) = test_storage();

        let path = storage.paths().tweet("to-delete");
        storage
            .write_json(&path, &TestData {
                id: "del".to_string(),
                value: 0,
            })
            .unwrap();

        assert!(storage.exists(&path));
        storage.delete(&path).unwrap();
        assert!(!storage.exists(&path));
    }

    #[test]
    fn uninitialized_storage_returns_error() {
        let storage = DocumentStorage::new(StoragePaths::new("/tmp/never-init"));

        let result = storage.read_json::<TestData>("/tmp/any.json");
        assert!(matches!(result, Err(StorageError::NotInitialized)));
        assert!(matches!(storage.health_check(), Err(StorageError::NotInitialized)));
    }
}
