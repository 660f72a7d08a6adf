//! CLI module
//!
//! Commands:
//! - validate: check one JSON value against a named contract
//! - list: print registered contract names
//! - check: load configuration and definitions, report the contract count

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, list, load_registry, run_command, validate, EXIT_REJECTED};
pub use errors::{CliError, CliResult};
pub use io::{parse_input, read_input, write_json};
