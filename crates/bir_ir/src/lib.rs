#![cfg_attr(docsrs, feature(doc_cfg))]

//! # bir-ir
//!
//! SSA-style IR model and tree-walking emitter for the `bir` language
//! (§4.4). This is an owned, in-crate data model with a `Display`-based
//! `.ll`-style textual form for tests and `--emit-ir-only` output — it is
//! not a binding to LLVM, and the `IrModule` it produces is never handed to
//! a real backend.
//!
//! [`emit_program`] lowers one [`bir_lang::ast::Program`] that has already
//! passed [`bir_lang::sema::check`] into one [`IrModule`]. Locals are
//! resolved through the emitter's own lexical scope rather than the
//! checker's `SymbolId`s (see the [`emit`] module docs for why); struct
//! layouts, free functions, and methods are resolved through the
//! back-annotated symbol slots the checker already filled in.

pub mod emit;
pub mod error;
pub mod module;

pub use emit::emit_program;
pub use error::EmitError;
pub use module::{
    IrBinOp, IrBlock, IrFloatPred, IrFunction, IrInstr, IrIntPred, IrModule, IrStructType, IrTerminator, IrType, IrValue, Reg,
};
