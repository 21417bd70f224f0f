//! Observability subsystem
//!
//! Logging goes through `tracing`; this module only installs the subscriber.
//! Per-request spans come from `tower_http::trace::TraceLayer` in the server.

mod logger;

pub use logger::{env_filter, init_logger, LogFormat};
