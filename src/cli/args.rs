//! CLI argument definitions using clap
//!
//! Commands:
//! - filevault serve [--config <path>] [--host ..] [--port ..] [--upload-dir ..]
//! - filevault check-config [--config <path>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// filevault - bearer-token protected HTTP file store
#[derive(Parser, Debug)]
#[command(name = "filevault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Load and validate configuration, then print it (without the api key)
    CheckConfig {
        /// Optional JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Flags for `serve`; each one overrides file and environment values
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Optional JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to bind (overrides BIND_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides PORT)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Directory holding uploaded files
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
