//! Property-style checks for the invariants named in the front end's design
//! notes (lexer token well-formedness, checker symbol resolution, emitted
//! IR shape).

mod support;

use bir_base::{Interner, Symbol};
use bir_lang::token::TokenKind;
use bir_lang::Lexer;
use support::compile_ok;

// L1: no Identifier/IntLiteral/FloatLiteral/StringLiteral token has empty text,
// and the stream always ends in Eof for a lex-valid input.
#[test]
fn lexer_never_produces_empty_text_for_literal_or_identifier_tokens() {
    let mut interner = Interner::new();
    let mut lexer = Lexer::new("module m\nfunction f(x: int): float { return 3.5 }\n", &mut interner);
    let tokens = lexer.tokenize().expect("lex");

    assert_eq!(tokens.last().expect("non-empty stream").kind, TokenKind::Eof);
    for token in &tokens {
        match token.kind {
            TokenKind::Identifier | TokenKind::IntLiteral | TokenKind::FloatLiteral | TokenKind::StringLiteral => {
                assert_ne!(token.text, Symbol::EMPTY, "{:?} token had empty text", token.kind);
            }
            _ => {}
        }
    }
}

// C3: every non-void function's body ends with a Return node, enforced by
// the checker; a function falling off the end without returning is rejected.
#[test]
fn non_void_function_missing_a_trailing_return_is_rejected() {
    let err = support::check_err("module m\nfunction f(): int { var x: int = 1 }\n");
    assert!(matches!(err, bir_lang::SemError::MissingReturn { .. } | bir_lang::SemError::TypeMismatch { .. }));
}

// E1: one IR function per declared function/method, one IR named type per
// declared struct.
#[test]
fn emitter_produces_one_ir_function_per_declared_function_and_method() {
    let source = "module m\n\
         struct P { x: int }\n\
         implement P { function get(): int { return this.x } }\n\
         function top(): int { return 1 }\n";
    let module = compile_ok(source);
    assert_eq!(module.structs.len(), 1);
    assert_eq!(module.functions.len(), 2);
    let names: Vec<&str> = module.functions.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"m_P_get"));
    assert!(names.contains(&"m_top"));
}

// Every emitted block ends in exactly one terminator; the emitter never
// leaves a block open.
#[test]
fn every_emitted_block_has_exactly_one_terminator() {
    let source = "module m\nfunction f(x: int): int { if x > 0 { return x } return 0 }\n";
    let module = compile_ok(source);
    for block in &module.functions[0].blocks {
        assert!(block.terminator.is_some(), "block {:?} left unterminated", block.label);
    }
}
