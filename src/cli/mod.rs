//! CLI module for Serene
//!
//! Provides command-line interface for:
//! - serve: Load a configuration and serve its routes
//! - check: Validate a configuration and print its route table

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
