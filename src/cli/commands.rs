//! CLI command implementations

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{init_logger, LogFormat};

use super::args::{Cli, Command, ServeArgs};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    // A missing .env file is normal.
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve(args) => serve(args),
        Command::CheckConfig { config } => check_config(config.as_deref()),
    }
}

/// Resolve the effective configuration: file, then environment, then flags
pub fn resolve_config(args: &ServeArgs) -> CliResult<HttpServerConfig> {
    let mut config = HttpServerConfig::load(args.config.as_deref())?;
    apply_flags(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn apply_flags(config: &mut HttpServerConfig, args: &ServeArgs) {
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(dir) = &args.upload_dir {
        config.upload_dir = dir.clone();
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
}

/// Start the HTTP server and block until shutdown
pub fn serve(args: ServeArgs) -> CliResult<()> {
    let config = resolve_config(&args)?;

    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_logger(&config.log_level, format);
    debug!(?config, "resolved configuration");

    let server = HttpServer::with_config(config)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate configuration and print it as JSON
pub fn check_config(config_path: Option<&Path>) -> CliResult<()> {
    let config = HttpServerConfig::load(config_path)?;
    config.validate()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &config)?;
    writeln!(out)?;
    Ok(())
}
