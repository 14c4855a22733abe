//! Command-line parsing and dispatch.

mod check;
mod run;
mod transform;

use crate::error::{CliError, Result};
use clap::{Args, Parser, Subcommand};
use opov_mem::StringInterner;
use opov_syntax::ast::Program;
use opov_transform::TransformOptions;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "opov", version, about = "Rewrite JavaScript operators into overload dispatch")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print the rewritten source.
    Transform(FileArgs),
    /// Rewrite, then evaluate and print console output.
    Run(FileArgs),
    /// Parse only and report diagnostics.
    Check(FileArgs),
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct FileArgs {
    /// Input file.
    pub path: PathBuf,

    /// Rewrite only where a directive enables it.
    #[arg(long)]
    pub default_disabled: bool,

    /// Spaces per indent level when printing.
    #[arg(long, default_value_t = 2)]
    pub indent: usize,
}

impl FileArgs {
    /// Pass configuration for these arguments.
    #[must_use]
    pub fn options(&self) -> TransformOptions {
        TransformOptions::default().with_enabled_by_default(!self.default_disabled)
    }
}

impl Cli {
    /// Runs the command.
    ///
    /// # Errors
    ///
    /// Returns the first I/O, syntax, or runtime error.
    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Command::Transform(args) => transform::execute(args),
            Command::Run(args) => run::execute(args),
            Command::Check(args) => check::execute(args),
        }
    }
}

/// Reads the input file.
fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and parses the input file.
fn parse_file(path: &Path) -> Result<(String, Program, StringInterner)> {
    let text = read_source(path)?;
    match opov_syntax::parse_program(&text) {
        Ok((program, interner)) => Ok((text, program, interner)),
        Err(error) => Err(CliError::Syntax {
            path: path.to_path_buf(),
            text,
            error,
        }),
    }
}
