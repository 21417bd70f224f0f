//! File HTTP Routes
//!
//! Upload, fetch-by-id and delete-by-id, all behind the bearer gate.
//! The returned URLs point at the unauthenticated `/uploads` mount.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderMap, Uri},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::BearerAuth;
use crate::file_storage::{FileStore, LocalBackend, StorageResult, StoredFile};

use super::errors::{ApiError, ApiResult};
use super::middleware::require_bearer;

/// Mount point of the static file service
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

// ==================
// Shared State
// ==================

/// File state shared across handlers
pub struct FileState {
    pub store: FileStore<LocalBackend>,
    pub auth: Arc<BearerAuth>,
    /// Replaces the request's scheme and host in returned URLs
    pub public_url: Option<String>,
    /// Host used when the request names none
    pub fallback_host: String,
    pub max_upload_bytes: Option<usize>,
}

impl FileState {
    /// Base URL (`scheme://host`) for links handed back to this request's client
    fn base_url(&self, headers: &HeaderMap, uri: &Uri) -> String {
        if let Some(url) = &self.public_url {
            return url.trim_end_matches('/').to_string();
        }

        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("http");

        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| uri.authority().map(|a| a.as_str()))
            .unwrap_or(&self.fallback_host);

        format!("{}://{}", scheme, host)
    }

    /// Link to a stored file under the static mount
    ///
    /// The extension comes from the client, so the name is encoded as a path
    /// segment; the static service decodes it back to the on-disk name.
    fn file_url(&self, headers: &HeaderMap, uri: &Uri, filename: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url(headers, uri),
            UPLOADS_PREFIX,
            urlencoding::encode(filename)
        )
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub filename: String,
    pub url: String,
    #[serde(rename = "originalName")]
    pub original_name: String,
    pub size: u64,
}

#[derive(Debug, Serialize)]
pub struct FileLocationResponse {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: String,
}

// ==================
// File Routes
// ==================

/// Create file routes, every one requiring the bearer token
pub fn file_routes(state: Arc<FileState>) -> Router {
    let body_limit = match state.max_upload_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/file", post(upload_file_handler).layer(body_limit))
        .route("/file/:id", get(get_file_handler).delete(delete_file_handler))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            require_bearer,
        ))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

/// Run a blocking store operation off the async workers
async fn run_blocking<T, F>(f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> StorageResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

// ==================
// File Handlers
// ==================

async fn upload_file_handler(
    State(state): State<Arc<FileState>>,
    headers: HeaderMap,
    uri: Uri,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    // A body that is not multipart at all simply carries no file.
    let mut multipart = multipart.map_err(|rejection| {
        debug!(%rejection, "upload without multipart body");
        ApiError::NoFile
    })?;

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // Parts without a filename are plain form fields, not files.
        let original_name = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        let store_state = state.clone();
        let mut pending =
            run_blocking(move || store_state.store.begin_upload(&original_name)).await?;
        let filename = pending.filename().to_string();

        // Chunks go straight to disk; the body is never held in memory.
        let written: ApiResult<StoredFile> = async {
            while let Some(chunk) = field.chunk().await? {
                pending.write_chunk(&chunk).await?;
            }
            Ok::<_, ApiError>(pending.finish().await?)
        }
        .await;

        let stored = match written {
            Ok(stored) => stored,
            Err(e) => {
                let store_state = state.clone();
                let discarded = run_blocking(move || store_state.store.discard(&filename)).await;
                if let Err(discard) = discarded {
                    warn!(error = %discard, "failed to remove partial upload");
                }
                return Err(e);
            }
        };

        let url = state.file_url(&headers, &uri, &stored.filename);
        return Ok(Json(UploadResponse {
            id: stored.id,
            filename: stored.filename,
            url,
            original_name: stored.original_name,
            size: stored.size,
        }));
    }

    Err(ApiError::NoFile)
}

async fn get_file_handler(
    State(state): State<Arc<FileState>>,
    headers: HeaderMap,
    uri: Uri,
    Path(id): Path<String>,
) -> ApiResult<Json<FileLocationResponse>> {
    let store_state = state.clone();
    let filename = run_blocking(move || store_state.store.find(&id)).await?;

    Ok(Json(FileLocationResponse {
        url: state.file_url(&headers, &uri, &filename),
        filename,
    }))
}

async fn delete_file_handler(
    State(state): State<Arc<FileState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let lookup_id = id.clone();
    run_blocking(move || state.store.delete(&lookup_id)).await?;

    Ok(Json(DeleteResponse {
        message: "File deleted successfully".to_string(),
        id,
    }))
}
