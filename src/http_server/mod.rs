//! # HTTP Server Module
//!
//! Axum server exposing the file API.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /api/file` - Upload (bearer token)
//! - `GET /api/file/:id` - Locate a file by id (bearer token)
//! - `DELETE /api/file/:id` - Delete a file by id (bearer token)
//! - `GET /uploads/<filename>` - Static file bytes, no token

pub mod config;
pub mod errors;
pub mod file_routes;
pub mod middleware;
pub mod observability_routes;
pub mod server;

pub use config::{ConfigError, HttpServerConfig};
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
