//! CLI argument definitions using clap
//!
//! Commands:
//! - contractkit validate --contract <name> [--config <path>] [--input <file>]
//! - contractkit list [--config <path>]
//! - contractkit check --config <path>

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Validate JSON values against named contracts
#[derive(Parser, Debug)]
#[command(name = "contractkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log verbosity on stderr. Repeat for more (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one JSON value read from a file or stdin
    Validate {
        /// Contract name
        #[arg(long)]
        contract: String,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Input file (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// List registered contracts
    List {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Load configuration and contract definitions without validating anything
    Check {
        /// Path to configuration file
        #[arg(long)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
