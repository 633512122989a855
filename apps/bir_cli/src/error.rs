//! Top-level error type unifying every compiler stage plus the driver's own
//! I/O and linking failures, so `main` has exactly one type to match on.

use std::io;
use std::path::PathBuf;

use bir_base::{Diagnostic, Position};
use bir_lang::{LexError, ParseError, SemError};
use bir_ir::EmitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("could not read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Sem(#[from] SemError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("linking failed: {message}")]
    Link { message: String },
}

impl Diagnostic for CompileError {
    fn kind(&self) -> &'static str {
        match self {
            CompileError::Io { .. } => "IoError",
            CompileError::Lex(e) => e.kind(),
            CompileError::Parse(e) => e.kind(),
            CompileError::Sem(e) => e.kind(),
            CompileError::Emit(e) => e.kind(),
            CompileError::Link { .. } => "LinkError",
        }
    }

    fn position(&self) -> Option<Position> {
        match self {
            CompileError::Io { .. } | CompileError::Link { .. } => None,
            CompileError::Lex(e) => e.position(),
            CompileError::Parse(e) => e.position(),
            CompileError::Sem(e) => e.position(),
            CompileError::Emit(e) => e.position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_renders_with_dashes() {
        let err = CompileError::Io {
            path: PathBuf::from("missing.bir"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            err.render(),
            "IoError: could not read 'missing.bir': not found, line: -, column: -"
        );
    }

    #[test]
    fn link_error_renders_with_dashes() {
        let err = CompileError::Link { message: "cc exited with status 1".to_string() };
        assert_eq!(err.render(), "LinkError: linking failed: cc exited with status 1, line: -, column: -");
    }
}
