//! Stage error types for lexing, parsing, and semantic analysis.

use bir_base::{Diagnostic, Position};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char, position: Position },

    #[error("leading zero not allowed in number literal")]
    LeadingZero { position: Position },

    #[error("number literal has more than one decimal point")]
    MalformedNumber { position: Position },

    #[error("string literal opened but never closed")]
    UnterminatedString { position: Position },
}

impl LexError {
    fn pos(&self) -> Position {
        match *self {
            LexError::UnexpectedChar { position, .. }
            | LexError::LeadingZero { position }
            | LexError::MalformedNumber { position }
            | LexError::UnterminatedString { position } => position,
        }
    }
}

impl Diagnostic for LexError {
    fn kind(&self) -> &'static str {
        "LexError"
    }
    fn position(&self) -> Option<Position> {
        Some(self.pos())
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    #[error("unexpected end of file")]
    UnexpectedEof { position: Position },

    #[error("invalid expression")]
    InvalidExpression { position: Position },
}

impl ParseError {
    fn pos(&self) -> Position {
        match *self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEof { position }
            | ParseError::InvalidExpression { position } => position,
        }
    }
}

impl Diagnostic for ParseError {
    fn kind(&self) -> &'static str {
        "ParseError"
    }
    fn position(&self) -> Option<Position> {
        Some(self.pos())
    }
}

#[derive(Debug, Error)]
pub enum SemError {
    #[error("undeclared symbol '{name}'")]
    UndeclaredSymbol { name: String, position: Position },

    #[error("symbol '{name}' redeclared in the same scope")]
    DuplicateSymbol { name: String, position: Position },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: String,
        position: Position,
    },

    #[error("condition does not evaluate to bool, found {found}")]
    NonBoolCondition { found: String, position: Position },

    #[error("'{name}' is not a function")]
    NotCallable { name: String, position: Position },

    #[error("struct '{name}' does not conform to interface '{interface}': missing method '{method}'")]
    InterfaceNotSatisfied {
        name: String,
        interface: String,
        method: String,
        position: Position,
    },

    #[error("wrong number of arguments: expected {expected}, found {found}")]
    ArityMismatch {
        expected: usize,
        found: usize,
        position: Position,
    },

    #[error("unknown type '{name}'")]
    UnknownType { name: String, position: Position },

    #[error("module '{name}' imported more than once")]
    DuplicateImport { name: String, position: Position },

    #[error("imported module '{name}' not found")]
    UnresolvedImport { name: String, position: Position },

    #[error("'{name}' has no field or method named '{member}'")]
    BadMemberAccess {
        name: String,
        member: String,
        position: Position,
    },

    #[error("cannot assign to '{name}': not an lvalue")]
    NotAnLvalue { name: String, position: Position },

    #[error("function '{name}' does not return on every path")]
    MissingReturn { name: String, position: Position },

    #[error("expression of type {found} cannot be used as {expected}")]
    InvalidExpressionForType {
        expected: String,
        found: String,
        position: Position,
    },
}

impl SemError {
    fn pos(&self) -> Position {
        match *self {
            SemError::UndeclaredSymbol { position, .. }
            | SemError::DuplicateSymbol { position, .. }
            | SemError::TypeMismatch { position, .. }
            | SemError::NonBoolCondition { position, .. }
            | SemError::NotCallable { position, .. }
            | SemError::InterfaceNotSatisfied { position, .. }
            | SemError::ArityMismatch { position, .. }
            | SemError::UnknownType { position, .. }
            | SemError::DuplicateImport { position, .. }
            | SemError::UnresolvedImport { position, .. }
            | SemError::BadMemberAccess { position, .. }
            | SemError::NotAnLvalue { position, .. }
            | SemError::MissingReturn { position, .. }
            | SemError::InvalidExpressionForType { position, .. } => position,
        }
    }
}

impl Diagnostic for SemError {
    fn kind(&self) -> &'static str {
        "SemError"
    }
    fn position(&self) -> Option<Position> {
        Some(self.pos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_renders_uniform_line() {
        let err = LexError::LeadingZero {
            position: Position::new(2, 5, 10),
        };
        assert_eq!(
            err.render(),
            "LexError: leading zero not allowed in number literal, line: 2, column: 5"
        );
    }

    #[test]
    fn sem_error_renders_uniform_line() {
        let err = SemError::UndeclaredSymbol {
            name: "x".to_string(),
            position: Position::new(7, 1, 40),
        };
        assert_eq!(
            err.render(),
            "SemError: undeclared symbol 'x', line: 7, column: 1"
        );
    }
}
