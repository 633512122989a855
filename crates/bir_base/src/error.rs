//! Diagnostic formatting shared by every compiler stage.
//!
//! Each stage (lexer, parser, checker, emitter, driver) defines its own
//! `thiserror`-derived error enum. They share one presentation contract,
//! [`Diagnostic`], so the driver can render any of them the same way:
//! `<kind>: <message>, line: L, column: C`.

use crate::span::Position;
use std::fmt;

/// A stage error that knows its own kind name and, if any, its source position.
///
/// Implemented by every `*Error` type in the workspace so the CLI driver can
/// render a uniform one-line diagnostic regardless of which stage failed.
pub trait Diagnostic: fmt::Display {
    /// Short tag identifying the error's taxonomy, e.g. `"LexError"`.
    fn kind(&self) -> &'static str;

    /// The source position the error occurred at, if one is known.
    fn position(&self) -> Option<Position>;

    /// Renders the `<kind>: <message>, line: L, column: C` line.
    ///
    /// Errors with no known position (e.g. I/O failures) render `line: -,
    /// column: -`.
    fn render(&self) -> String {
        match self.position() {
            Some(pos) => format!("{}: {}, line: {}, column: {}", self.kind(), self, pos.line, pos.column),
            None => format!("{}: {}, line: -, column: -", self.kind(), self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    impl fmt::Display for Dummy {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "boom")
        }
    }

    impl Diagnostic for Dummy {
        fn kind(&self) -> &'static str {
            "DummyError"
        }
        fn position(&self) -> Option<Position> {
            Some(Position::new(3, 7, 20))
        }
    }

    struct Positionless;

    impl fmt::Display for Positionless {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "no file")
        }
    }

    impl Diagnostic for Positionless {
        fn kind(&self) -> &'static str {
            "IoError"
        }
        fn position(&self) -> Option<Position> {
            None
        }
    }

    #[test]
    fn renders_kind_message_and_position() {
        assert_eq!(Dummy.render(), "DummyError: boom, line: 3, column: 7");
    }

    #[test]
    fn renders_dashes_when_position_unknown() {
        assert_eq!(Positionless.render(), "IoError: no file, line: -, column: -");
    }
}
