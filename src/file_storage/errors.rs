//! # File Storage Errors

use std::io;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// File storage errors
///
/// The `Display` text is the message returned to clients; the underlying
/// I/O error is kept as the source for logging only.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No stored file belongs to the id
    #[error("File not found")]
    NotFound(String),

    /// Listing the store directory failed
    #[error("Server error: Could not read directory")]
    ReadDir(#[source] io::Error),

    /// Writing an uploaded file failed
    #[error("Server error: Could not save file")]
    Write(#[source] io::Error),

    /// Unlinking a stored file failed
    #[error("Server error: Could not delete file")]
    Delete(#[source] io::Error),

    /// The store directory could not be created
    #[error("Could not create upload directory {path}")]
    CreateDir {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StorageError::NotFound(_) => 404,
            StorageError::ReadDir(_) => 500,
            StorageError::Write(_) => 500,
            StorageError::Delete(_) => 500,
            StorageError::CreateDir { .. } => 500,
        }
    }
}
