//! JSON I/O handling for CLI
//!
//! - Input: one JSON value from a file or stdin
//! - Output: one JSON object per line on stdout

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Reads one JSON value from `path`, or from stdin when `None`.
pub fn read_input(path: Option<&Path>) -> CliResult<Value> {
    let text = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            io::stdin().lock().read_to_string(&mut text)?;
            text
        }
    };
    parse_input(&text)
}

pub fn parse_input(text: &str) -> CliResult<Value> {
    if text.trim().is_empty() {
        return Err(CliError::EmptyInput);
    }
    Ok(serde_json::from_str(text)?)
}

/// Writes `value` as a single JSON line.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
