//! Pass A — type headers: registers a `Symbol` of kind Struct or Interface
//! for every struct/interface declaration, in source order. Struct member
//! tables are created empty here so `implement` blocks textually preceding
//! their struct still find a valid receiver table in pass B.

use bir_base::Interner;

use crate::ast::{Item, Program};
use crate::error::SemError;
use crate::symbol::{SymbolArena, SymbolEntry, SymbolKind, SymbolTable};

pub(super) fn run(
    programs: &[Program<'_>],
    arena: &mut SymbolArena,
    interner: &Interner,
) -> Result<Vec<SymbolTable>, SemError> {
    let mut tables = Vec::with_capacity(programs.len());

    for program in programs {
        let mut table = SymbolTable::new();
        for item in &program.items {
            let (name, kind, position) = match item {
                Item::Struct(s) => (s.name, SymbolKind::Struct, s.position),
                Item::Interface(i) => (i.name, SymbolKind::Interface, i.position),
                Item::Implement(_) | Item::Function(_) | Item::Const(_) => continue,
            };
            let mut entry = SymbolEntry::new(name, None, kind);
            entry.members = Some(SymbolTable::new());
            let id = arena.alloc(entry);
            if !table.insert(name, id) {
                return Err(SemError::DuplicateSymbol {
                    name: interner.resolve(name).to_string(),
                    position,
                });
            }
        }
        tables.push(table);
    }

    Ok(tables)
}
