//! # File Storage Module
//!
//! A single flat directory of uploaded files, addressed by generated id.

pub mod errors;
pub mod file;
pub mod backend;
pub mod local;

pub use errors::{StorageError, StorageResult};
pub use file::{FileStore, PendingUpload, StoredFile};
pub use backend::StorageBackend;
pub use local::LocalBackend;
