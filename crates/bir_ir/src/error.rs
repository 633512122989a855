//! Emitter errors (§7): every variant here represents an internal invariant
//! the checker is supposed to have already ruled out. A correct checker run
//! makes these unreachable in practice; they exist so the emitter fails with
//! a diagnostic instead of panicking if that invariant is ever violated.

use bir_base::{Diagnostic, Position};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("reference to '{name}' escaped checking unresolved")]
    UnresolvedSymbol { name: String, position: Position },

    #[error("'{name}' has no member table at emission time")]
    MissingMemberTable { name: String, position: Position },

    #[error("'{name}' is not an assignable storage location")]
    NotAddressable { name: String, position: Position },

    #[error("{what} is not supported by the emitter")]
    Unsupported { what: String, position: Position },
}

impl EmitError {
    fn pos(&self) -> Position {
        match *self {
            EmitError::UnresolvedSymbol { position, .. }
            | EmitError::MissingMemberTable { position, .. }
            | EmitError::NotAddressable { position, .. }
            | EmitError::Unsupported { position, .. } => position,
        }
    }
}

impl Diagnostic for EmitError {
    fn kind(&self) -> &'static str {
        "EmitError"
    }
    fn position(&self) -> Option<Position> {
        Some(self.pos())
    }
}
