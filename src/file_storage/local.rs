//! # Local Filesystem Backend

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use super::backend::StorageBackend;
use super::errors::{StorageError, StorageResult};

/// Local filesystem storage backend rooted at a single directory
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a new local backend, creating the root directory if absent
    pub fn create(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::CreateDir {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Root directory holding every stored file
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl StorageBackend for LocalBackend {
    type Writer = tokio::fs::File;

    fn create_file(&self, name: &str) -> StorageResult<Self::Writer> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.full_path(name))
            .map_err(StorageError::Write)?;

        Ok(tokio::fs::File::from_std(file))
    }

    fn delete(&self, name: &str) -> StorageResult<()> {
        // A file that vanished after lookup is a delete failure, not a 404.
        fs::remove_file(self.full_path(name)).map_err(StorageError::Delete)
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let mut results = Vec::new();

        for entry in fs::read_dir(&self.root).map_err(StorageError::ReadDir)? {
            let entry = entry.map_err(StorageError::ReadDir)?;
            if let Some(name) = entry.file_name().to_str() {
                results.push(name.to_string());
            }
        }

        Ok(results)
    }
}
