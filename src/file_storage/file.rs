//! # File Operations
//!
//! Id assignment, on-disk naming and lookup-by-id over a [`StorageBackend`].
//!
//! Stored files are named `<id>` or `<id>.<ext>`. Nothing else is persisted:
//! the directory listing is the only index, so every lookup is a scan.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};
use uuid::Uuid;

use super::backend::StorageBackend;
use super::errors::{StorageError, StorageResult};

/// A file accepted by [`FileStore::upload`]
///
/// `original_name` and `size` exist only here; they are not recoverable later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: String,
    pub filename: String,
    pub original_name: String,
    pub size: u64,
}

/// Extension of a client-supplied filename, without the dot.
///
/// Only the final path component counts. Leading dots do not start an
/// extension, so `.bashrc` has none while `archive.tar.gz` yields `gz`.
pub fn extension_of(original_name: &str) -> Option<&str> {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let leading_dots = base.len() - base.trim_start_matches('.').len();
    let stem_and_ext = &base[leading_dots..];

    stem_and_ext
        .rfind('.')
        .map(|idx| &stem_and_ext[idx + 1..])
}

/// On-disk name for an id and optional extension
pub fn storage_name(id: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

/// Whether an on-disk name belongs to id.
///
/// A name belongs to an id when it is the id itself or the id followed by an
/// extension. A bare prefix such as `abc` never matches `abcdef.png`.
pub fn belongs_to(name: &str, id: &str) -> bool {
    match name.strip_prefix(id) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// Ids that could never have been generated are rejected before any scan.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\', '.'])
}

/// An upload in progress: the file exists on disk and receives bytes in order
///
/// Dropping a pending upload leaves whatever was written so far; callers hand
/// failed uploads to [`FileStore::discard`].
#[derive(Debug)]
pub struct PendingUpload<W> {
    id: String,
    filename: String,
    original_name: String,
    writer: W,
    size: u64,
}

impl<W: AsyncWrite + Unpin> PendingUpload<W> {
    /// On-disk name the bytes are going to
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Append a chunk of the upload
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> StorageResult<()> {
        self.writer
            .write_all(chunk)
            .await
            .map_err(StorageError::Write)?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    /// Flush the remaining bytes and report the stored file
    pub async fn finish(mut self) -> StorageResult<StoredFile> {
        self.writer.flush().await.map_err(StorageError::Write)?;

        info!(id = %self.id, filename = %self.filename, size = self.size, "stored upload");

        Ok(StoredFile {
            id: self.id,
            filename: self.filename,
            original_name: self.original_name,
            size: self.size,
        })
    }
}

/// File store: upload, lookup and delete by id
#[derive(Debug)]
pub struct FileStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> FileStore<B> {
    /// Create a new file store
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Open a fresh id for an upload, keeping the original extension
    pub fn begin_upload(&self, original_name: &str) -> StorageResult<PendingUpload<B::Writer>> {
        let id = Uuid::new_v4().to_string();
        let filename = storage_name(&id, extension_of(original_name));
        let writer = self.backend.create_file(&filename)?;

        Ok(PendingUpload {
            id,
            filename,
            original_name: original_name.to_string(),
            writer,
            size: 0,
        })
    }

    /// Remove the partial file of an upload that failed
    pub fn discard(&self, filename: &str) -> StorageResult<()> {
        self.backend.delete(filename)?;
        debug!(%filename, "discarded partial upload");
        Ok(())
    }

    /// Find the on-disk name belonging to id
    pub fn find(&self, id: &str) -> StorageResult<String> {
        if !is_valid_id(id) {
            return Err(StorageError::NotFound(id.to_string()));
        }

        self.backend
            .list()?
            .into_iter()
            .find(|name| belongs_to(name, id))
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    /// Delete the file belonging to id, returning its on-disk name
    pub fn delete(&self, id: &str) -> StorageResult<String> {
        let filename = self.find(id)?;
        self.backend.delete(&filename)?;

        debug!(%id, %filename, "deleted file");

        Ok(filename)
    }
}
