//! Three-pass semantic checker (§4.3): type headers, declarations, bodies.
//!
//! Each pass processes every module before the next begins. Passes A and B
//! build a [`SymbolArena`] plus one top-level [`SymbolTable`] per module;
//! pass C walks every function/method body, back-annotating `Variable`,
//! `MemberAccess`, and declaration nodes with the `SymbolId` the checker
//! resolved for them.

mod pass_a;
mod pass_b;
mod pass_c;

use std::collections::HashMap;

use bir_base::{Interner, Symbol};

use crate::ast::Program;
use crate::error::SemError;
use crate::symbol::{SymbolArena, SymbolTable};

/// One compiled module: its dotted source path and top-level symbol table.
pub struct ModuleInfo {
    pub path: Vec<Symbol>,
    pub top_level: SymbolTable,
}

/// Result of a full check: the arena owning every resolved symbol, plus one
/// [`ModuleInfo`] per input program, in input order.
pub struct CheckedUnit {
    pub arena: SymbolArena,
    pub modules: Vec<ModuleInfo>,
}

/// Lowers a dotted module path to the emitted name prefix, e.g. `a.b` -> `a_b`.
pub fn module_name(path: &[Symbol], interner: &Interner) -> String {
    path.iter()
        .map(|s| interner.resolve(*s))
        .collect::<Vec<_>>()
        .join("_")
}

/// Resolves each program's `import` declarations against the set of compiled
/// modules, mapping alias-or-last-segment to a module index. Checked once,
/// ahead of pass C, since every method/function body may reference imports.
pub(crate) fn resolve_imports(
    programs: &[Program<'_>],
    interner: &Interner,
) -> Result<Vec<HashMap<Symbol, usize>>, SemError> {
    let mut result = Vec::with_capacity(programs.len());
    for program in programs {
        let mut aliases: HashMap<Symbol, usize> = HashMap::new();
        for import in &program.imports {
            let target = programs
                .iter()
                .position(|candidate| candidate.module.path == import.path);
            let Some(target) = target else {
                return Err(SemError::UnresolvedImport {
                    name: import.path.iter().map(|s| interner.resolve(*s)).collect::<Vec<_>>().join("."),
                    position: import.position,
                });
            };
            let key = import.alias.unwrap_or(*import.path.last().expect("non-empty path"));
            if aliases.insert(key, target).is_some() {
                return Err(SemError::DuplicateImport {
                    name: interner.resolve(key).to_string(),
                    position: import.position,
                });
            }
        }
        result.push(aliases);
    }
    Ok(result)
}

/// Runs all three passes over `programs`, which must be given in a stable,
/// arbitrary order — cross-module references are resolved by name, not by
/// declaration order between modules.
pub fn check(programs: &[Program<'_>], interner: &Interner) -> Result<CheckedUnit, SemError> {
    let mut arena = SymbolArena::new();

    let mut tables = pass_a::run(programs, &mut arena, interner)?;
    pass_b::run(programs, &mut tables, &mut arena, interner)?;
    let imports = resolve_imports(programs, interner)?;
    pass_c::run(programs, &tables, &imports, &mut arena, interner)?;

    let modules = programs
        .iter()
        .zip(tables)
        .map(|(program, top_level)| ModuleInfo {
            path: program.module.path.clone(),
            top_level,
        })
        .collect();

    Ok(CheckedUnit { arena, modules })
}
