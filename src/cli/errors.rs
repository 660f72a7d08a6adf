//! CLI-specific error types

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::contract::LoaderError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error("unknown contract '{0}'")]
    UnknownContract(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid input JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty input")]
    EmptyInput,
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "CLI_CONFIG_ERROR",
            CliError::Loader(_) => "CLI_DEFINITION_ERROR",
            CliError::UnknownContract(_) => "CLI_UNKNOWN_CONTRACT",
            CliError::Io(_) => "CLI_IO_ERROR",
            CliError::Json(_) | CliError::EmptyInput => "CLI_INPUT_ERROR",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
