//! Shared lex -> parse -> check -> emit helper for the end-to-end tests.
//!
//! Each test compiles a single in-memory module; nothing here touches the
//! filesystem or the CLI driver directly.

use bir_base::Interner;
use bir_ir::{emit_program, IrModule};
use bir_lang::parser::AstArenas;
use bir_lang::sema::{self, CheckedUnit};
use bir_lang::{Lexer, Parser, SemError};

/// Runs the full front end over one source string and returns its IR.
pub fn compile_ok(source: &str) -> IrModule {
    let mut interner = Interner::new();
    let mut lexer = Lexer::new(source, &mut interner);
    let tokens = lexer.tokenize().expect("lex");
    let arenas = AstArenas::new();
    let mut parser = Parser::new(tokens, &interner, &arenas);
    let program = parser.parse_program().expect("parse");
    let checked: CheckedUnit = sema::check(std::slice::from_ref(&program), &interner).expect("check");
    emit_program(std::slice::from_ref(&program), 0, &checked, &interner).expect("emit")
}

/// Runs lex/parse/check over one source string, returning the checker's
/// error instead of panicking. Used for the reject scenarios.
pub fn check_err(source: &str) -> SemError {
    let mut interner = Interner::new();
    let mut lexer = Lexer::new(source, &mut interner);
    let tokens = lexer.tokenize().expect("lex");
    let arenas = AstArenas::new();
    let mut parser = Parser::new(tokens, &interner, &arenas);
    let program = parser.parse_program().expect("parse");
    sema::check(std::slice::from_ref(&program), &interner).expect_err("expected a semantic error")
}
