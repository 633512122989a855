#![cfg_attr(docsrs, feature(doc_cfg))]

//! # bir-lang
//!
//! Lexer, recursive-descent parser, and three-pass semantic checker for the
//! `bir` language: a small statically-typed systems language with structs,
//! interfaces, and `implement` blocks.
//!
//! ## Architecture
//!
//! The front end runs in three stages:
//!
//! 1. **Lexer** ([`lexer`]) - Tokenizes source text into a stream of
//!    [`Token`]s, interning identifiers and string literals via a shared
//!    [`Interner`].
//!
//! 2. **Parser** ([`parser`]) - Recursive-descent with operator-precedence
//!    climbing, producing an arena-backed [`ast`] (no recovery: the first
//!    mismatched token aborts the parse).
//!
//! 3. **Semantic checker** ([`sema`]) - Three passes over every compiled
//!    module: type headers, then declarations, then bodies. Resolves every
//!    name to a [`symbol::SymbolId`] and back-annotates the AST with it.
//!
//! ## Example
//!
//! ```no_run
//! use bir_base::Interner;
//! use bir_lang::lexer::Lexer;
//! use bir_lang::parser::{AstArenas, Parser};
//! use bir_lang::sema;
//!
//! let mut interner = Interner::new();
//! let source = "module main\nfunction main(): void {}\n";
//! let mut lexer = Lexer::new(source, &mut interner);
//! let tokens = lexer.tokenize().unwrap();
//! let arenas = AstArenas::new();
//! let mut parser = Parser::new(tokens, &interner, &arenas);
//! let program = parser.parse_program().unwrap();
//! let checked = sema::check(&[program], &interner).unwrap();
//! assert_eq!(checked.modules.len(), 1);
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod sema;
pub mod symbol;
pub mod token;

pub use error::{LexError, ParseError, SemError};
pub use lexer::Lexer;
pub use parser::{AstArenas, Parser};
pub use sema::{check, module_name, CheckedUnit, ModuleInfo};
pub use token::{Token, TokenKind};

// Re-exported for crates (bir-ir, bir-cli) that only need the shared atoms
// and shouldn't also depend on bir-base directly.
pub use bir_base::{Arena, Interner, Position, Span, Symbol};
