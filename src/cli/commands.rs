//! CLI command implementations
//!
//! Every command builds the registry the same way: configuration file when
//! given (defaults otherwise), built-in catalog, then declarative
//! definitions. Output goes to stdout as JSON; logs go to stderr.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use serde_json::{json, Value};

use crate::api::{BadRequestBody, SuccessResponse};
use crate::config::Config;
use crate::contract::{ContractError, ContractRegistry};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_json};

/// Exit status for input a contract rejected.
pub const EXIT_REJECTED: u8 = 2;

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<ExitCode> {
    let mut stdout = io::stdout().lock();
    match cmd {
        Command::Validate {
            contract,
            config,
            input,
        } => {
            let registry = load_registry(config.as_deref())?;
            let raw = read_input(input.as_deref())?;
            let accepted = validate(&registry, &contract, &raw, &mut stdout)?;
            Ok(if accepted {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_REJECTED)
            })
        }
        Command::List { config } => {
            let registry = load_registry(config.as_deref())?;
            list(&registry, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { config } => {
            check(&config, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Builds the registry from an optional configuration file.
pub fn load_registry(config_path: Option<&Path>) -> CliResult<ContractRegistry> {
    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    Ok(ContractRegistry::from_config(&config)?)
}

/// Validates `raw` against `contract` and writes the outcome.
///
/// Returns whether the input was accepted. Rejection is not an error: the
/// 400 body is written and `false` returned.
pub fn validate<W: Write>(
    registry: &ContractRegistry,
    contract: &str,
    raw: &Value,
    out: &mut W,
) -> CliResult<bool> {
    match registry.validate(contract, raw) {
        Ok(data) => {
            write_json(out, &SuccessResponse::new(data))?;
            Ok(true)
        }
        Err(ContractError::Invalid(failures)) => {
            write_json(out, &BadRequestBody::from(&failures))?;
            Ok(false)
        }
        Err(ContractError::UnknownContract(name)) => Err(CliError::UnknownContract(name)),
    }
}

pub fn list<W: Write>(registry: &ContractRegistry, out: &mut W) -> CliResult<()> {
    let names: Vec<&str> = registry.names().collect();
    write_json(out, &SuccessResponse::new(json!(names)))
}

/// Loads configuration and every definition, then reports the count.
pub fn check<W: Write>(config_path: &Path, out: &mut W) -> CliResult<()> {
    let registry = load_registry(Some(config_path))?;
    write_json(
        out,
        &SuccessResponse::new(json!({ "contracts": registry.len() })),
    )
}
