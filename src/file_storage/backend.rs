//! # Storage Backend Trait

use tokio::io::AsyncWrite;

use super::errors::StorageResult;

/// Backend trait for a flat file store
///
/// Names are single path components; backends never create nested paths.
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Sink for an upload's bytes
    type Writer: AsyncWrite + Unpin + Send + 'static;

    /// Open a new file under name for writing. Existing names are never reused.
    fn create_file(&self, name: &str) -> StorageResult<Self::Writer>;

    /// Delete the file with this name
    fn delete(&self, name: &str) -> StorageResult<()>;

    /// List every stored file name
    fn list(&self) -> StorageResult<Vec<String>>;
}
