//! CLI module for filevault
//!
//! Provides command-line interface for:
//! - serve: resolve configuration and run the HTTP server
//! - check-config: validate configuration without starting anything

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, ServeArgs};
pub use commands::{check_config, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
