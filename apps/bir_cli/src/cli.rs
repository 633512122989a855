//! Command-line interface for the `bir` compiler front end.
//!
//! This module provides the command-line argument parsing and dispatch
//! logic for the `birc` driver binary: lex, parse, check, and emit every
//! file given on the command line, then link the results into an
//! executable.
//!
//! # Examples
//!
//! ```bash
//! # Compile and link
//! birc main.bir
//!
//! # Emit IR only, skip the linker (no system toolchain required)
//! birc --emit-ir-only -o build main.bir shapes.bir
//! ```

use std::path::PathBuf;

use clap::Parser as ClapParser;

use crate::error::CompileError;
use crate::linker::SystemLinker;
use crate::pipeline::{self, CompileOptions};

/// Command-line interface for the `bir` compiler.
#[derive(ClapParser)]
#[command(name = "birc")]
#[command(about = "Compiles bir source files to IR and links them", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Source files to compile.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output executable path.
    #[arg(short, long, default_value = "a.out")]
    pub output: PathBuf,

    /// Directory to write the per-module `.ll` IR text into.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Stop after writing IR; skip invoking the linker.
    #[arg(long)]
    pub emit_ir_only: bool,
}

/// Parses command-line arguments and runs the compiler.
///
/// # Errors
///
/// Returns an error if any file cannot be read, or if lexing, parsing,
/// checking, emission, or linking fails for any module.
pub fn run_cli() -> Result<(), CompileError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let options = CompileOptions {
        output: cli.output,
        out_dir: cli.out_dir,
        emit_ir_only: cli.emit_ir_only,
    };
    let linker = SystemLinker;

    pipeline::compile_files(&cli.files, &options, &linker)
}
