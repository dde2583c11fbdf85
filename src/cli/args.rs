//! CLI argument definitions using clap
//!
//! Commands:
//! - docview query --config <path>
//! - docview check-ddoc --file <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docview - evaluate view queries over precomputed view rows
#[derive(Parser, Debug)]
#[command(name = "docview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one view query read from stdin and exit
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./docview.json")]
        config: PathBuf,
    },

    /// Validate a design document and exit
    CheckDdoc {
        /// Path to the design document
        #[arg(long)]
        file: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
