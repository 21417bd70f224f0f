//! # Auth Module
//!
//! Single shared-secret bearer authentication for the file API.

pub mod errors;
pub mod crypto;
pub mod bearer;

pub use errors::{AuthError, AuthResult};
pub use bearer::BearerAuth;
