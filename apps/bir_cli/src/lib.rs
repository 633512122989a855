#![cfg_attr(docsrs, feature(doc_cfg))]

//! # bir-cli
//!
//! Command-line driver for the `bir` compiler front end: the `birc` binary.
//!
//! This crate owns only the process boundary — argument parsing, file I/O,
//! and invoking the downstream linker. All language semantics (lexing,
//! parsing, checking, IR emission) live in [`bir_lang`] and [`bir_ir`]; this
//! crate just wires them together and maps failures to exit codes.
//!
//! # Module Structure
//!
//! - [`cli`] — argument parsing (`clap`) and the `run_cli` entry point
//! - [`pipeline`] — lex/parse/check/emit/link orchestration
//! - [`linker`] — the `Linker` seam and its `SystemLinker`/`FakeLinker` impls
//! - [`error`] — `CompileError`, unifying every stage's error type
//!
//! # Library Usage
//!
//! ```no_run
//! use bir_cli::linker::SystemLinker;
//! use bir_cli::pipeline::{compile_files, CompileOptions};
//! use std::path::PathBuf;
//!
//! let options = CompileOptions::default();
//! compile_files(&[PathBuf::from("main.bir")], &options, &SystemLinker)?;
//! # Ok::<(), bir_cli::error::CompileError>(())
//! ```

pub mod cli;
pub mod error;
pub mod linker;
pub mod pipeline;

/// Entry point for the CLI. Parses argv and runs the compiler; see
/// [`cli::run_cli`] for details.
pub use cli::run_cli;
pub use error::CompileError;
