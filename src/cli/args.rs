//! CLI argument definitions using clap
//!
//! Commands:
//! - serene serve --config <path> [--port <port>]
//! - serene check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Serene - generic REST handlers over an entity store
#[derive(Parser, Debug)]
#[command(name = "serene")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the configured routes over an in-memory store
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./serene.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate a configuration file and print its route table
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./serene.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["serene", "serve", "--config", "demo.json", "--port", "9000"])
            .unwrap();
        match cli.command {
            Command::Serve { config, port } => {
                assert_eq!(config, PathBuf::from("demo.json"));
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_check_default_config() {
        let cli = Cli::try_parse_from(["serene", "check"]).unwrap();
        match cli.command {
            Command::Check { config } => assert_eq!(config, PathBuf::from("./serene.json")),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
