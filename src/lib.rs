//! filevault - a bearer-token protected HTTP file store
//!
//! Uploaded files live in one directory, named by a generated id plus the
//! original extension, and are served back statically under `/uploads`.

pub mod auth;
pub mod cli;
pub mod file_storage;
pub mod http_server;
pub mod observability;
