//! contractkit CLI entry point
//!
//! Parses arguments, installs the stderr log subscriber, and delegates to
//! the CLI module. Errors are printed to stderr with a non-zero exit.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use contractkit::cli::{self, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli::run_command(cli.command) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(code = e.code(), "command failed");
            eprintln!("{}: {}", e.code(), e);
            ExitCode::FAILURE
        }
    }
}
