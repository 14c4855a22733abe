//! `opov` CLI: Command-Line Driver
//!
//! The `opov` tool runs the operator-overload pass over one file:
//! - `opov transform <file>` - Print the rewritten source
//! - `opov run <file>` - Rewrite, then evaluate with the reference runtime
//! - `opov check <file>` - Parse only and report diagnostics
//!
//! Logging goes to stderr and is configured with `OPOV_LOG`.

mod commands;
mod error;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    opov_log::init_from_env();

    let cli = commands::Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report();
            ExitCode::FAILURE
        }
    }
}
