//! CLI-specific error types
//!
//! Every CLI error ends the process with exit code 1 after printing
//! `CODE: message` to stderr. Codes are stable for scripting:
//!
//! - `SERENE_CLI_CONFIG_ERROR`: the config file could not be read, is not
//!   valid JSON (serde errors are folded in by `ServerConfig::load`), or
//!   names models, properties or routes that do not fit together
//! - `SERENE_CLI_IO_ERROR`: writing the `check` report failed
//! - `SERENE_CLI_SERVE_FAILED`: runtime, bind or serve loop failure

use std::fmt;
use std::io;

use crate::rest_api::RestError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file missing, malformed or inconsistent
    ConfigError,
    /// Writing to stdout failed
    IoError,
    /// Server could not start or stopped with an error
    ServeFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SERENE_CLI_CONFIG_ERROR",
            Self::IoError => "SERENE_CLI_IO_ERROR",
            Self::ServeFailed => "SERENE_CLI_SERVE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Serve failed
    pub fn serve_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

/// Loading and verifying a config only fails with configuration errors;
/// anything else reaching the CLI means the router could not be served.
impl From<RestError> for CliError {
    fn from(e: RestError) -> Self {
        match e {
            RestError::Configuration(reason) => Self::config_error(reason),
            other => Self::serve_failed(other.to_string()),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
