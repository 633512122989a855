//! Symbol table model: `Symbol` (here `SymbolEntry`), `SymbolType`
//! (`SymbolKind` + `Signature`), `SymbolTable`, and the scope stack.
//!
//! Symbols are stored in a per-module [`SymbolArena`] and referenced by
//! [`SymbolId`] index rather than by pointer, breaking the `Symbol.node` /
//! `Node.symbol` reference cycle the source design has in a garbage-collected
//! host language.

use std::collections::HashMap;

use bir_base::{Stack, Symbol};

use crate::ast::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Module,
    Literal,
    Variable,
    Function,
    Struct,
    Interface,
    Const,
}

/// A function or method signature: ordered parameter types, return type,
/// and whether an implicit leading `self`/`this` parameter was prepended.
#[derive(Debug, Clone)]
pub struct Signature {
    pub params: Vec<Type>,
    pub return_type: Type,
    pub has_self: bool,
}

impl Signature {
    /// Declared arity, excluding the implicit leading `self`.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// One entry in a [`SymbolArena`]: name, owning module, kind, and — for
/// functions — a signature, for variables/consts/fields — a type, or — for
/// struct/interface types — an attached member table.
#[derive(Debug, Clone)]
pub struct SymbolEntry {
    pub name: Symbol,
    pub module: Option<Symbol>,
    pub kind: SymbolKind,
    pub ty: Option<Type>,
    pub signature: Option<Signature>,
    pub members: Option<SymbolTable>,
    /// For `Struct` entries only: the registered `init` constructor, if any.
    pub constructor: Option<SymbolId>,
}

impl SymbolEntry {
    pub fn new(name: Symbol, module: Option<Symbol>, kind: SymbolKind) -> Self {
        SymbolEntry {
            name,
            module,
            kind,
            ty: None,
            signature: None,
            members: None,
            constructor: None,
        }
    }
}

/// Mapping from name (unique within the table) to `SymbolId`.
///
/// Insertion order is preserved and observable via [`SymbolTable::names_in_order`]
/// — struct field layout is determined by source order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    order: Vec<Symbol>,
    map: HashMap<Symbol, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Inserts `name -> id`. Returns `false` without modifying the table if
    /// `name` is already present (a duplicate-symbol condition the caller
    /// should turn into a `SemError`).
    pub fn insert(&mut self, name: Symbol, id: SymbolId) -> bool {
        if self.map.contains_key(&name) {
            return false;
        }
        self.map.insert(name, id);
        self.order.push(name);
        true
    }

    pub fn get(&self, name: Symbol) -> Option<SymbolId> {
        self.map.get(&name).copied()
    }

    pub fn names_in_order(&self) -> &[Symbol] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Owns every `SymbolEntry` allocated while checking one module.
#[derive(Debug, Default)]
pub struct SymbolArena {
    entries: Vec<SymbolEntry>,
}

impl SymbolArena {
    pub fn new() -> Self {
        SymbolArena::default()
    }

    pub fn alloc(&mut self, entry: SymbolEntry) -> SymbolId {
        let id = SymbolId(self.entries.len() as u32);
        self.entries.push(entry);
        id
    }

    pub fn get(&self, id: SymbolId) -> &SymbolEntry {
        &self.entries[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut SymbolEntry {
        &mut self.entries[id.0 as usize]
    }
}

/// Ordered stack of `SymbolTable` references; innermost on top.
/// `search` walks top-down, first match wins.
#[derive(Default)]
pub struct ScopeStack<'a> {
    frames: Stack<&'a SymbolTable>,
}

impl<'a> ScopeStack<'a> {
    pub fn new() -> Self {
        ScopeStack { frames: Stack::new() }
    }

    pub fn push(&mut self, table: &'a SymbolTable) {
        self.frames.push(table);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    pub fn search(&self, name: Symbol) -> Option<SymbolId> {
        self.frames.find_map_top_down(|table| table.get(name))
    }

    /// Current frame count, so a caller can restore the stack to this depth
    /// after a block introduces an unknown number of `var`/`const` frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Pops frames until exactly `depth` remain.
    pub fn truncate_to(&mut self, depth: usize) {
        while self.frames.len() > depth {
            self.frames.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bir_base::Interner;

    #[test]
    fn symbol_table_rejects_duplicate_insert() {
        let mut interner = Interner::new();
        let name = interner.intern("x");
        let mut table = SymbolTable::new();
        assert!(table.insert(name, SymbolId(0)));
        assert!(!table.insert(name, SymbolId(1)));
    }

    #[test]
    fn symbol_table_preserves_source_order() {
        let mut interner = Interner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let mut table = SymbolTable::new();
        table.insert(b, SymbolId(0));
        table.insert(a, SymbolId(1));
        assert_eq!(table.names_in_order(), &[b, a]);
    }

    #[test]
    fn scope_stack_innermost_wins() {
        let mut interner = Interner::new();
        let name = interner.intern("x");
        let mut outer = SymbolTable::new();
        outer.insert(name, SymbolId(0));
        let mut inner = SymbolTable::new();
        inner.insert(name, SymbolId(1));

        let mut stack = ScopeStack::new();
        stack.push(&outer);
        stack.push(&inner);
        assert_eq!(stack.search(name), Some(SymbolId(1)));
        stack.pop();
        assert_eq!(stack.search(name), Some(SymbolId(0)));
    }

    #[test]
    fn signature_arity_excludes_self() {
        let sig = Signature {
            params: vec![Type::Int, Type::Float],
            return_type: Type::Bool,
            has_self: true,
        };
        assert_eq!(sig.arity(), 2);
    }
}
