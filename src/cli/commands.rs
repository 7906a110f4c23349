//! CLI command implementations
//!
//! Both commands load the same JSON configuration and run the full
//! verification (models, handler configs, route paths) before doing
//! anything else.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::http_server::{HttpServer, ServerConfig};
use crate::store::MemoryStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Check { config } => check(&config),
    }
}

/// Serve the configured routes over a fresh in-memory store.
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = ServerConfig::load(config_path)?;
    if let Some(port) = port {
        config.port = port;
    }

    let server = HttpServer::new(config, Arc::new(MemoryStore::new()))?;
    info!(addr = %server.socket_addr(), routes = server.routes().len(), "configuration loaded");

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate a configuration file and print its route table to stdout.
pub fn check(config_path: &Path) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    check_to(config_path, &mut out)
}

/// [`check`], writing to `out`
pub fn check_to(config_path: &Path, out: &mut impl Write) -> CliResult<()> {
    let config = ServerConfig::load(config_path)?;
    let model_count = config.models.len();
    let server = HttpServer::new(config, Arc::new(MemoryStore::new()))?;

    writeln!(out, "{}: OK", config_path.display())?;
    writeln!(out, "{} models, {} routes", model_count, server.routes().len())?;
    for route in server.routes() {
        writeln!(out, "  {}", route)?;
    }
    Ok(())
}
