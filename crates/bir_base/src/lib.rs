#![cfg_attr(docsrs, feature(doc_cfg))]

//! # bir-base
//!
//! Pure structural atoms shared by every crate in the `bir` toolchain.
//!
//! - [`Arena`] — bump allocation for stable AST references
//! - [`Interner`]/[`Symbol`] — string interning for O(1) equality
//! - [`Span`]/[`Position`] — source location tracking
//! - [`Diagnostic`] — shared one-line error rendering
//! - [`Stack`] — scope/block/function stacks used by the checker and emitter
//!
//! # Design Principles
//!
//! This crate has no knowledge of the `bir` language's grammar or types. It
//! provides only generic, reusable infrastructure that `bir-lang` and
//! `bir-ir` build upon.

pub mod arena;
pub mod error;
pub mod intern;
pub mod span;
pub mod stack;

pub use arena::Arena;
pub use error::Diagnostic;
pub use intern::{Interner, Symbol, SymbolEq};
pub use span::{Position, Span};
pub use stack::Stack;
