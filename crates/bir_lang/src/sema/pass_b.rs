//! Pass B — declarations: populates struct fields, interface method
//! signatures, `implement` block methods (with an implicit leading `self`),
//! free function signatures, and top-level const types.

use bir_base::{Interner, Position, Symbol};

use crate::ast::{ConstDecl, Expr, FunctionDecl, FunctionSignature, Item, Param, Program, Type};
use crate::error::SemError;
use crate::symbol::{Signature, SymbolArena, SymbolEntry, SymbolId, SymbolKind, SymbolTable};

pub(super) fn run(
    programs: &[Program<'_>],
    tables: &mut [SymbolTable],
    arena: &mut SymbolArena,
    interner: &Interner,
) -> Result<(), SemError> {
    for (program, table) in programs.iter().zip(tables.iter_mut()) {
        for item in &program.items {
            match item {
                Item::Struct(s) => {
                    let struct_id = table.get(s.name).expect("registered in pass A");
                    for field in &s.fields {
                        resolve_type(&field.ty, table, interner, field.position)?;
                        let field_id = alloc_variable(arena, field);
                        insert_member(arena, struct_id, field.name, field_id, interner, field.position)?;
                    }
                }
                Item::Interface(i) => {
                    let iface_id = table.get(i.name).expect("registered in pass A");
                    for method in &i.methods {
                        resolve_signature_types(method, table, interner)?;
                        let method_id = alloc_signature(arena, method, false);
                        insert_member(arena, iface_id, method.name, method_id, interner, method.position)?;
                    }
                }
                Item::Implement(impl_block) => {
                    let Some(struct_id) = table.get(impl_block.name) else {
                        return Err(SemError::UndeclaredSymbol {
                            name: interner.resolve(impl_block.name).to_string(),
                            position: impl_block.position,
                        });
                    };
                    for method in &impl_block.methods {
                        resolve_function_types(method, table, interner)?;
                        let method_id = alloc_function(arena, method, true);
                        method.symbol.set(Some(method_id));
                        insert_member(arena, struct_id, method.name, method_id, interner, method.position)?;
                    }
                    if let Some(ctor) = &impl_block.constructor {
                        for param in &ctor.params {
                            resolve_type(&param.ty, table, interner, param.position)?;
                        }
                        let mut entry = SymbolEntry::new(impl_block.name, None, SymbolKind::Function);
                        entry.signature = Some(Signature {
                            params: ctor.params.iter().map(|p| p.ty.clone()).collect(),
                            return_type: Type::Void,
                            has_self: true,
                        });
                        let ctor_id = arena.alloc(entry);
                        arena.get_mut(struct_id).constructor = Some(ctor_id);
                    }
                }
                Item::Function(function) => {
                    resolve_function_types(function, table, interner)?;
                    let function_id = alloc_function(arena, function, false);
                    function.symbol.set(Some(function_id));
                    if !table.insert(function.name, function_id) {
                        return Err(SemError::DuplicateSymbol {
                            name: interner.resolve(function.name).to_string(),
                            position: function.position,
                        });
                    }
                }
                Item::Const(constant) => {
                    let value_ty = literal_type(constant);
                    if let Some(declared) = &constant.ty {
                        if !super::pass_c::type_name_eq(declared, &value_ty) {
                            return Err(SemError::TypeMismatch {
                                expected: super::pass_c::type_display(declared, interner),
                                found: super::pass_c::type_display(&value_ty, interner),
                                position: constant.position,
                            });
                        }
                    }
                    let mut entry = SymbolEntry::new(constant.name, None, SymbolKind::Const);
                    entry.ty = Some(constant.ty.clone().unwrap_or(value_ty));
                    let const_id = arena.alloc(entry);
                    if !table.insert(constant.name, const_id) {
                        return Err(SemError::DuplicateSymbol {
                            name: interner.resolve(constant.name).to_string(),
                            position: constant.position,
                        });
                    }
                }
            }
        }
    }

    Ok(())
}

fn literal_type(constant: &ConstDecl<'_>) -> Type {
    match constant.value {
        Expr::IntLit(..) => Type::Int,
        Expr::FloatLit(..) => Type::Float,
        Expr::StringLit(..) => Type::String,
        Expr::BoolLit(..) => Type::Bool,
        _ => unreachable!("const values are restricted to literals by the parser"),
    }
}

fn alloc_variable(arena: &mut SymbolArena, field: &Param) -> SymbolId {
    let mut entry = SymbolEntry::new(field.name, None, SymbolKind::Variable);
    entry.ty = Some(field.ty.clone());
    arena.alloc(entry)
}

fn alloc_signature(arena: &mut SymbolArena, sig: &FunctionSignature, has_self: bool) -> SymbolId {
    let mut entry = SymbolEntry::new(sig.name, None, SymbolKind::Function);
    entry.signature = Some(Signature {
        params: sig.params.iter().map(|p| p.ty.clone()).collect(),
        return_type: sig.return_type.clone().unwrap_or(Type::Void),
        has_self,
    });
    arena.alloc(entry)
}

fn alloc_function(arena: &mut SymbolArena, function: &FunctionDecl<'_>, has_self: bool) -> SymbolId {
    let mut entry = SymbolEntry::new(function.name, None, SymbolKind::Function);
    entry.signature = Some(Signature {
        params: function.params.iter().map(|p| p.ty.clone()).collect(),
        return_type: function.return_type.clone().unwrap_or(Type::Void),
        has_self,
    });
    arena.alloc(entry)
}

fn resolve_signature_types(sig: &FunctionSignature, table: &SymbolTable, interner: &Interner) -> Result<(), SemError> {
    for param in &sig.params {
        resolve_type(&param.ty, table, interner, param.position)?;
    }
    if let Some(ret) = &sig.return_type {
        resolve_type(ret, table, interner, sig.position)?;
    }
    Ok(())
}

fn resolve_function_types(function: &FunctionDecl<'_>, table: &SymbolTable, interner: &Interner) -> Result<(), SemError> {
    for param in &function.params {
        resolve_type(&param.ty, table, interner, param.position)?;
    }
    if let Some(ret) = &function.return_type {
        resolve_type(ret, table, interner, function.position)?;
    }
    Ok(())
}

/// Validates that a declared `Type` refers to a primitive or a struct/interface
/// declared in this module. Cross-module type references are not resolved
/// here; only `a.b` member access crosses module boundaries (§4.3).
fn resolve_type(ty: &Type, table: &SymbolTable, interner: &Interner, position: Position) -> Result<(), SemError> {
    match ty {
        Type::Int | Type::Float | Type::Bool | Type::String | Type::Void => Ok(()),
        Type::Named(name, _args) => {
            if table.get(*name).is_some() {
                Ok(())
            } else {
                Err(SemError::UnknownType {
                    name: interner.resolve(*name).to_string(),
                    position,
                })
            }
        }
    }
}

fn insert_member(
    arena: &mut SymbolArena,
    owner: SymbolId,
    name: Symbol,
    id: SymbolId,
    interner: &Interner,
    position: Position,
) -> Result<(), SemError> {
    let members = arena
        .get_mut(owner)
        .members
        .as_mut()
        .expect("struct/interface always has a member table");
    if members.insert(name, id) {
        Ok(())
    } else {
        Err(SemError::DuplicateSymbol {
            name: interner.resolve(name).to_string(),
            position,
        })
    }
}
