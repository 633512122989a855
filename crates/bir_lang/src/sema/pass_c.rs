//! Pass C — bodies: walks every function/method/constructor body, typing
//! each expression and statement and back-annotating `Variable`,
//! `MemberAccess`, and declaration nodes with the `SymbolId` the checker
//! resolved for them.

use std::collections::HashMap;

use bir_base::{Arena, Interner, Position, Symbol};

use crate::ast::{BinaryOp, ElseBranch, Expr, ExprRef, FunctionDecl, Item, Program, Stmt, StmtRef, Type};
use crate::error::SemError;
use crate::symbol::{ScopeStack, Signature, SymbolArena, SymbolEntry, SymbolId, SymbolKind, SymbolTable};

pub(super) fn run(
    programs: &[Program<'_>],
    tables: &[SymbolTable],
    imports: &[HashMap<Symbol, usize>],
    arena: &mut SymbolArena,
    interner: &Interner,
) -> Result<(), SemError> {
    for (module_index, program) in programs.iter().enumerate() {
        for item in &program.items {
            match item {
                Item::Function(function) => {
                    check_function(function, None, module_index, tables, imports, arena, interner)?;
                }
                Item::Implement(impl_block) => {
                    let this_ty = Type::Named(impl_block.name, Vec::new());
                    for method in &impl_block.methods {
                        check_function(method, Some(this_ty.clone()), module_index, tables, imports, arena, interner)?;
                    }
                    if let Some(ctor) = &impl_block.constructor {
                        let scope_arena: Arena<SymbolTable> = Arena::new();
                        let mut scope = ScopeStack::new();
                        scope.push(&tables[module_index]);
                        let params = this_and_params(Some(this_ty.clone()), &ctor.params, arena, interner);
                        scope.push(&params);
                        let mut cursor = ScopeCursor {
                            scope: &mut scope,
                            scope_arena: &scope_arena,
                            return_type: &Type::Void,
                            module_index,
                            tables,
                            imports,
                            arena: &mut *arena,
                            interner,
                        };
                        cursor.check_nested_no_scope(ctor.body)?;
                    }
                }
                Item::Struct(_) | Item::Interface(_) | Item::Const(_) => {}
            }
        }
    }
    Ok(())
}

fn this_and_params(
    this_ty: Option<Type>,
    params: &[crate::ast::Param],
    arena: &mut SymbolArena,
    interner: &Interner,
) -> SymbolTable {
    let mut table = SymbolTable::new();
    if let Some(ty) = this_ty {
        if let Some(this_sym) = interner.lookup("this") {
            let mut entry = SymbolEntry::new(this_sym, None, SymbolKind::Variable);
            entry.ty = Some(ty);
            let id = arena.alloc(entry);
            table.insert(this_sym, id);
        }
    }
    for param in params {
        let mut entry = SymbolEntry::new(param.name, None, SymbolKind::Variable);
        entry.ty = Some(param.ty.clone());
        let id = arena.alloc(entry);
        table.insert(param.name, id);
    }
    table
}

fn check_function(
    function: &FunctionDecl<'_>,
    this_ty: Option<Type>,
    module_index: usize,
    tables: &[SymbolTable],
    imports: &[HashMap<Symbol, usize>],
    arena: &mut SymbolArena,
    interner: &Interner,
) -> Result<(), SemError> {
    let return_type = function.return_type.clone().unwrap_or(Type::Void);
    let params = this_and_params(this_ty, &function.params, arena, interner);

    let scope_arena: Arena<SymbolTable> = Arena::new();
    let mut scope = ScopeStack::new();
    scope.push(&tables[module_index]);
    scope.push(&params);

    {
        let mut cursor = ScopeCursor {
            scope: &mut scope,
            scope_arena: &scope_arena,
            return_type: &return_type,
            module_index,
            tables,
            imports,
            arena,
            interner,
        };
        cursor.check_nested_no_scope(function.body)?;
    }

    if !matches!(return_type, Type::Void) && !always_returns(function.body) {
        return Err(SemError::MissingReturn {
            name: interner.resolve(function.name).to_string(),
            position: function.position,
        });
    }

    Ok(())
}

fn always_returns(body: &[StmtRef<'_>]) -> bool {
    match body.last() {
        Some(Stmt::Return { .. }) => true,
        Some(Stmt::If { then_block, else_branch: Some(branch), .. }) => {
            let else_returns = match branch {
                ElseBranch::Block(block) => always_returns(*block),
                ElseBranch::If(stmt) => always_returns(std::slice::from_ref(stmt)),
            };
            always_returns(*then_block) && else_returns
        }
        _ => false,
    }
}

/// Walks statement/expression bodies, resolving names against a
/// [`ScopeStack`] and the enclosing module's symbol tables.
struct ScopeCursor<'a, 'b> {
    scope: &'b mut ScopeStack<'a>,
    /// Backs every per-declaration scope frame created while walking a body;
    /// bump-allocated so pushing a new frame never invalidates references to
    /// earlier ones (mirrors the AST arena's allocation discipline).
    scope_arena: &'b Arena<SymbolTable>,
    return_type: &'b Type,
    module_index: usize,
    tables: &'b [SymbolTable],
    imports: &'b [HashMap<Symbol, usize>],
    arena: &'b mut SymbolArena,
    interner: &'b Interner,
}

impl<'a, 'b> ScopeCursor<'a, 'b> {
    fn check_stmt(&mut self, stmt: &'a Stmt<'a>) -> Result<(), SemError> {
        match stmt {
            Stmt::VarDecl { name, ty, init, position, symbol } => {
                let init_ty = init.map(|e| self.check_expr(e)).transpose()?;
                let effective = match (ty, &init_ty) {
                    (Some(declared), Some(found)) => {
                        if !assignable(declared, found, self.module_index, self.tables, self.arena) {
                            return Err(SemError::TypeMismatch {
                                expected: type_display(declared, self.interner),
                                found: type_display(found, self.interner),
                                position: *position,
                            });
                        }
                        declared.clone()
                    }
                    (Some(declared), None) => declared.clone(),
                    (None, Some(found)) => found.clone(),
                    (None, None) => unreachable!("parser requires a type or an initializer"),
                };
                let mut entry = SymbolEntry::new(*name, None, SymbolKind::Variable);
                entry.ty = Some(effective);
                let id = self.arena.alloc(entry);
                symbol.set(Some(id));
                self.bind_single(*name, id);
                Ok(())
            }
            Stmt::ConstDecl { name, ty, value, position, symbol } => {
                let value_ty = self.check_expr(*value)?;
                if let Some(declared) = ty {
                    if !type_name_eq(declared, &value_ty) {
                        return Err(SemError::TypeMismatch {
                            expected: type_display(declared, self.interner),
                            found: type_display(&value_ty, self.interner),
                            position: *position,
                        });
                    }
                }
                let mut entry = SymbolEntry::new(*name, None, SymbolKind::Const);
                entry.ty = Some(ty.clone().unwrap_or(value_ty));
                let id = self.arena.alloc(entry);
                symbol.set(Some(id));
                self.bind_single(*name, id);
                Ok(())
            }
            Stmt::If { cond, then_block, else_branch, position } => {
                let cond_ty = self.check_expr(*cond)?;
                if !matches!(cond_ty, Type::Bool) {
                    return Err(SemError::NonBoolCondition {
                        found: type_display(&cond_ty, self.interner),
                        position: *position,
                    });
                }
                self.check_nested(*then_block)?;
                match else_branch {
                    Some(ElseBranch::Block(block)) => self.check_nested(*block)?,
                    Some(ElseBranch::If(stmt)) => self.check_stmt(*stmt)?,
                    None => {}
                }
                Ok(())
            }
            Stmt::While { cond, body, else_block, position } => {
                let cond_ty = self.check_expr(*cond)?;
                if !matches!(cond_ty, Type::Bool) {
                    return Err(SemError::NonBoolCondition {
                        found: type_display(&cond_ty, self.interner),
                        position: *position,
                    });
                }
                self.check_nested(*body)?;
                if let Some(block) = else_block {
                    self.check_nested(*block)?;
                }
                Ok(())
            }
            Stmt::For { var, ty, iterable, body, symbol, .. } => {
                // `for` has no defined typing rules in the source system
                // (open question, §9): the iterable is walked only to
                // resolve the names it references, never checked against an
                // element type.
                self.check_expr(*iterable)?;
                let depth = self.scope.depth();
                if let Some(declared) = ty {
                    let mut entry = SymbolEntry::new(*var, None, SymbolKind::Variable);
                    entry.ty = Some(declared.clone());
                    let id = self.arena.alloc(entry);
                    symbol.set(Some(id));
                    self.bind_single(*var, id);
                }
                let result = self.check_nested_no_scope(*body);
                self.scope.truncate_to(depth);
                result
            }
            Stmt::With { expr, body, .. } => {
                // `with` likewise has no defined semantics (§9); the head
                // expression is still walked for symbol resolution.
                self.check_expr(*expr)?;
                if let Some(block) = body {
                    self.check_nested(*block)?;
                }
                Ok(())
            }
            Stmt::Return { value, position } => {
                match (value, self.return_type) {
                    (Some(expr), want) => {
                        let found = self.check_expr(*expr)?;
                        if !assignable(want, &found, self.module_index, self.tables, self.arena) {
                            return Err(SemError::TypeMismatch {
                                expected: type_display(want, self.interner),
                                found: type_display(&found, self.interner),
                                position: *position,
                            });
                        }
                    }
                    (None, Type::Void) => {}
                    (None, want) => {
                        return Err(SemError::TypeMismatch {
                            expected: type_display(want, self.interner),
                            found: "void".to_string(),
                            position: *position,
                        });
                    }
                }
                Ok(())
            }
            Stmt::Assignment { target, value, position } => {
                if !matches!(*target, Expr::Variable(..) | Expr::MemberAccess(..)) {
                    return Err(SemError::NotAnLvalue {
                        name: type_display(&self.check_expr(*target)?, self.interner),
                        position: *position,
                    });
                }
                let target_ty = self.check_expr(*target)?;
                let value_ty = self.check_expr(*value)?;
                if !assignable(&target_ty, &value_ty, self.module_index, self.tables, self.arena) {
                    return Err(SemError::TypeMismatch {
                        expected: type_display(&target_ty, self.interner),
                        found: type_display(&value_ty, self.interner),
                        position: *position,
                    });
                }
                Ok(())
            }
            Stmt::ExprStmt { expr, .. } => {
                self.check_expr(*expr)?;
                Ok(())
            }
        }
    }

    /// Allocates a fresh single-entry frame for one `var`/`const`/loop
    /// binding and pushes it, so later siblings in the same block see it.
    fn bind_single(&mut self, name: Symbol, id: SymbolId) {
        let mut table = SymbolTable::new();
        table.insert(name, id);
        let table = self.scope_arena.alloc(table);
        self.scope.push(table);
    }

    /// Checks a nested block (`if`/`while`/`with` body), restoring the scope
    /// to its depth on entry regardless of how many bindings it introduced.
    fn check_nested(&mut self, stmts: &'a [StmtRef<'a>]) -> Result<(), SemError> {
        let depth = self.scope.depth();
        let result = self.check_nested_no_scope(stmts);
        self.scope.truncate_to(depth);
        result
    }

    fn check_nested_no_scope(&mut self, stmts: &'a [StmtRef<'a>]) -> Result<(), SemError> {
        for stmt in stmts {
            self.check_stmt(*stmt)?;
        }
        Ok(())
    }

    fn check_expr(&mut self, expr: ExprRef<'a>) -> Result<Type, SemError> {
        match expr {
            Expr::IntLit(..) => Ok(Type::Int),
            Expr::FloatLit(..) => Ok(Type::Float),
            Expr::StringLit(..) => Ok(Type::String),
            Expr::BoolLit(..) => Ok(Type::Bool),
            Expr::Variable(name, position, slot) => {
                if let Some(id) = self.scope.search(*name) {
                    slot.set(Some(id));
                    return Ok(self.arena.get(id).ty.clone().unwrap_or(Type::Void));
                }
                if let Some(id) = self.tables[self.module_index].get(*name) {
                    slot.set(Some(id));
                    let entry = self.arena.get(id);
                    return Ok(match entry.kind {
                        SymbolKind::Struct | SymbolKind::Interface => Type::Named(*name, Vec::new()),
                        _ => entry.ty.clone().unwrap_or(Type::Void),
                    });
                }
                Err(SemError::UndeclaredSymbol {
                    name: self.interner.resolve(*name).to_string(),
                    position: *position,
                })
            }
            Expr::Binary(op, left, right, position) => self.check_binary(*op, *left, *right, *position),
            Expr::Unary(_, operand, position) => {
                let ty = self.check_expr(*operand)?;
                if !matches!(ty, Type::Bool) {
                    return Err(SemError::TypeMismatch {
                        expected: "bool".to_string(),
                        found: type_display(&ty, self.interner),
                        position: *position,
                    });
                }
                Ok(Type::Bool)
            }
            Expr::Call(callee, args, position) => self.check_call(*callee, args.as_slice(), *position),
            Expr::MemberAccess(obj, member, position, slot) => self.check_member(*obj, *member, *position, slot),
            Expr::Index(obj, index, _position) => {
                self.check_expr(*obj)?;
                self.check_expr(*index)?;
                Ok(Type::Void)
            }
            Expr::As(inner, ty, position) => self.check_as(*inner, ty, *position),
        }
    }

    fn check_binary(&mut self, op: BinaryOp, left: ExprRef<'a>, right: ExprRef<'a>, position: Position) -> Result<Type, SemError> {
        let lhs = self.check_expr(left)?;
        let rhs = self.check_expr(right)?;
        let mismatch = |lhs: &Type, rhs: &Type, interner: &Interner| SemError::TypeMismatch {
            expected: type_display(lhs, interner),
            found: type_display(rhs, interner),
            position,
        };
        match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                if type_name_eq(&lhs, &rhs) && matches!(lhs, Type::Int | Type::Float) {
                    Ok(lhs)
                } else {
                    Err(mismatch(&lhs, &rhs, self.interner))
                }
            }
            BinaryOp::Eq | BinaryOp::NotEq => {
                if type_name_eq(&lhs, &rhs) && matches!(lhs, Type::Int | Type::Float | Type::String | Type::Bool) {
                    Ok(Type::Bool)
                } else {
                    Err(mismatch(&lhs, &rhs, self.interner))
                }
            }
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                if type_name_eq(&lhs, &rhs) && matches!(lhs, Type::Int | Type::Float) {
                    Ok(Type::Bool)
                } else {
                    Err(mismatch(&lhs, &rhs, self.interner))
                }
            }
            BinaryOp::And | BinaryOp::Or => {
                if matches!(lhs, Type::Bool) && matches!(rhs, Type::Bool) {
                    Ok(Type::Bool)
                } else {
                    Err(mismatch(&lhs, &rhs, self.interner))
                }
            }
        }
    }

    fn check_as(&mut self, inner: ExprRef<'a>, ty: &Type, position: Position) -> Result<Type, SemError> {
        let inner_ty = self.check_expr(inner)?;
        if type_name_eq(&inner_ty, ty) {
            return Ok(ty.clone());
        }
        if let (Type::Named(struct_name, _), Type::Named(iface_name, _)) = (&inner_ty, ty) {
            let table = &self.tables[self.module_index];
            if let (Some(struct_id), Some(iface_id)) = (table.get(*struct_name), table.get(*iface_name)) {
                let strukt = self.arena.get(struct_id);
                let iface = self.arena.get(iface_id);
                if strukt.kind == SymbolKind::Struct && iface.kind == SymbolKind::Interface {
                    if let Some(method) = first_unsatisfied_method(iface, strukt, self.arena, self.interner) {
                        return Err(SemError::InterfaceNotSatisfied {
                            name: self.interner.resolve(*struct_name).to_string(),
                            interface: self.interner.resolve(*iface_name).to_string(),
                            method,
                            position,
                        });
                    }
                    return Ok(ty.clone());
                }
            }
        }
        Err(SemError::InvalidExpressionForType {
            expected: type_display(ty, self.interner),
            found: type_display(&inner_ty, self.interner),
            position,
        })
    }

    fn check_member(
        &mut self,
        obj: ExprRef<'a>,
        member: Symbol,
        position: Position,
        slot: &std::cell::Cell<Option<SymbolId>>,
    ) -> Result<Type, SemError> {
        if let Expr::Variable(name, _, _) = obj {
            if self.scope.search(*name).is_none() {
                if let Some(&target_module) = self.imports[self.module_index].get(name) {
                    let target = &self.tables[target_module];
                    let Some(id) = target.get(member) else {
                        return Err(SemError::BadMemberAccess {
                            name: self.interner.resolve(*name).to_string(),
                            member: self.interner.resolve(member).to_string(),
                            position,
                        });
                    };
                    slot.set(Some(id));
                    let entry = self.arena.get(id);
                    return Ok(match entry.kind {
                        SymbolKind::Struct | SymbolKind::Interface => Type::Named(member, Vec::new()),
                        _ => entry.ty.clone().unwrap_or(Type::Void),
                    });
                }
            }
        }
        let obj_ty = self.check_expr(obj)?;
        let Type::Named(type_name, _) = &obj_ty else {
            return Err(SemError::BadMemberAccess {
                name: type_display(&obj_ty, self.interner),
                member: self.interner.resolve(member).to_string(),
                position,
            });
        };
        let Some(owner_id) = self.tables[self.module_index].get(*type_name) else {
            return Err(SemError::UnknownType {
                name: self.interner.resolve(*type_name).to_string(),
                position,
            });
        };
        let owner = self.arena.get(owner_id);
        let members = owner.members.as_ref().expect("struct/interface has member table");
        let Some(member_id) = members.get(member) else {
            return Err(SemError::BadMemberAccess {
                name: self.interner.resolve(*type_name).to_string(),
                member: self.interner.resolve(member).to_string(),
                position,
            });
        };
        slot.set(Some(member_id));
        Ok(self.arena.get(member_id).ty.clone().unwrap_or(Type::Void))
    }

    fn check_call(&mut self, callee: ExprRef<'a>, args: &'a [ExprRef<'a>], position: Position) -> Result<Type, SemError> {
        let (signature, struct_ctor, slot): (Signature, Option<Symbol>, Option<(&std::cell::Cell<Option<SymbolId>>, SymbolId)>) = match callee {
            Expr::Variable(name, pos, slot) => {
                let id = self.scope.search(*name).or_else(|| self.tables[self.module_index].get(*name));
                let Some(id) = id else {
                    return Err(SemError::UndeclaredSymbol {
                        name: self.interner.resolve(*name).to_string(),
                        position: *pos,
                    });
                };
                let entry = self.arena.get(id);
                match entry.kind {
                    SymbolKind::Function => (
                        entry.signature.clone().expect("function has a signature"),
                        None,
                        Some((slot, id)),
                    ),
                    SymbolKind::Struct => {
                        let ctor_sig = entry.constructor.map(|ctor_id| {
                            self.arena.get(ctor_id).signature.clone().expect("constructor has a signature")
                        });
                        (
                            ctor_sig.unwrap_or(Signature { params: Vec::new(), return_type: Type::Void, has_self: true }),
                            Some(*name),
                            Some((slot, id)),
                        )
                    }
                    _ => {
                        return Err(SemError::NotCallable {
                            name: self.interner.resolve(*name).to_string(),
                            position: *pos,
                        })
                    }
                }
            }
            Expr::MemberAccess(obj, member, pos, member_slot) => {
                // An import alias (`alias.func(...)`) resolves through the
                // target module's top-level table, same as a plain
                // `alias.member` read in `check_member` — never as a value
                // expression on `obj`.
                let alias_name = if let Expr::Variable(name, _, _) = *obj { Some(*name) } else { None };
                let cross_module_target = match alias_name {
                    Some(name) if self.scope.search(name).is_none() => {
                        self.imports[self.module_index].get(&name).copied()
                    }
                    _ => None,
                };

                if let Some(target_module) = cross_module_target {
                    let name = alias_name.expect("cross_module_target implies alias_name");
                    let target = &self.tables[target_module];
                    let Some(id) = target.get(*member) else {
                        return Err(SemError::BadMemberAccess {
                            name: self.interner.resolve(name).to_string(),
                            member: self.interner.resolve(*member).to_string(),
                            position: *pos,
                        });
                    };
                    let entry = self.arena.get(id);
                    let SymbolKind::Function = entry.kind else {
                        return Err(SemError::NotCallable {
                            name: self.interner.resolve(*member).to_string(),
                            position: *pos,
                        });
                    };
                    let sig = entry.signature.clone().expect("function has a signature");
                    (sig, None, Some((member_slot, id)))
                } else {
                    let obj_ty = self.check_expr(*obj)?;
                    let Type::Named(type_name, _) = &obj_ty else {
                        return Err(SemError::NotCallable {
                            name: type_display(&obj_ty, self.interner),
                            position: *pos,
                        });
                    };
                    let Some(owner_id) = self.tables[self.module_index].get(*type_name) else {
                        return Err(SemError::UnknownType { name: self.interner.resolve(*type_name).to_string(), position: *pos });
                    };
                    let owner = self.arena.get(owner_id);
                    let members = owner.members.as_ref().expect("struct/interface has member table");
                    let Some(method_id) = members.get(*member) else {
                        return Err(SemError::BadMemberAccess {
                            name: self.interner.resolve(*type_name).to_string(),
                            member: self.interner.resolve(*member).to_string(),
                            position: *pos,
                        });
                    };
                    let entry = self.arena.get(method_id);
                    let Some(sig) = entry.signature.clone() else {
                        return Err(SemError::NotCallable {
                            name: self.interner.resolve(*member).to_string(),
                            position: *pos,
                        });
                    };
                    (sig, None, Some((member_slot, method_id)))
                }
            }
            _ => {
                return Err(SemError::NotCallable {
                    name: type_display(&self.check_expr(callee)?, self.interner),
                    position,
                })
            }
        };

        if args.len() != signature.arity() {
            return Err(SemError::ArityMismatch {
                expected: signature.arity(),
                found: args.len(),
                position,
            });
        }
        for (arg, param_ty) in args.iter().zip(&signature.params) {
            let arg_ty = self.check_expr(*arg)?;
            if !assignable(param_ty, &arg_ty, self.module_index, self.tables, self.arena) {
                return Err(SemError::TypeMismatch {
                    expected: type_display(param_ty, self.interner),
                    found: type_display(&arg_ty, self.interner),
                    position,
                });
            }
        }

        if let Some((slot, id)) = slot {
            slot.set(Some(id));
        }

        Ok(match struct_ctor {
            Some(name) => Type::Named(name, Vec::new()),
            None => signature.return_type,
        })
    }
}

/// Names match exactly for primitives; for `Named` types, template arguments
/// are ignored (templates are parsed but never expanded, §4.3/§9).
pub(super) fn type_name_eq(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Int, Type::Int)
        | (Type::Float, Type::Float)
        | (Type::Bool, Type::Bool)
        | (Type::String, Type::String)
        | (Type::Void, Type::Void) => true,
        (Type::Named(a, _), Type::Named(b, _)) => a == b,
        _ => false,
    }
}

fn assignable(left: &Type, right: &Type, module_index: usize, tables: &[SymbolTable], arena: &SymbolArena) -> bool {
    if type_name_eq(left, right) {
        return true;
    }
    if let (Type::Named(left_name, _), Type::Named(right_name, _)) = (left, right) {
        let table = &tables[module_index];
        if let (Some(iface_id), Some(struct_id)) = (table.get(*left_name), table.get(*right_name)) {
            let iface = arena.get(iface_id);
            let strukt = arena.get(struct_id);
            if iface.kind == SymbolKind::Interface && strukt.kind == SymbolKind::Struct {
                return first_unsatisfied_method_quiet(iface, strukt, arena).is_none();
            }
        }
    }
    false
}

fn method_matches(iface_sig: &Signature, struct_sig: &Signature) -> bool {
    type_name_eq(&iface_sig.return_type, &struct_sig.return_type)
        && iface_sig.arity() == struct_sig.arity()
        && iface_sig.params.iter().zip(&struct_sig.params).all(|(i, s)| type_name_eq(i, s))
}

fn first_unsatisfied_method_quiet(iface: &SymbolEntry, strukt: &SymbolEntry, arena: &SymbolArena) -> Option<SymbolId> {
    let iface_members = iface.members.as_ref().expect("interface has member table");
    let struct_members = strukt.members.as_ref().expect("struct has member table");
    for name in iface_members.names_in_order() {
        let iface_id = iface_members.get(*name).expect("present");
        let iface_method = arena.get(iface_id);
        let Some(struct_method_id) = struct_members.get(*name) else {
            return Some(iface_id);
        };
        let struct_method = arena.get(struct_method_id);
        let matches = match (&iface_method.signature, &struct_method.signature) {
            (Some(isig), Some(ssig)) => method_matches(isig, ssig),
            _ => false,
        };
        if !matches {
            return Some(iface_id);
        }
    }
    None
}

fn first_unsatisfied_method(iface: &SymbolEntry, strukt: &SymbolEntry, arena: &SymbolArena, interner: &Interner) -> Option<String> {
    let missing_id = first_unsatisfied_method_quiet(iface, strukt, arena)?;
    Some(interner.resolve(arena.get(missing_id).name).to_string())
}

pub(super) fn type_display(ty: &Type, interner: &Interner) -> String {
    match ty {
        Type::Int => "int".to_string(),
        Type::Float => "float".to_string(),
        Type::Bool => "bool".to_string(),
        Type::String => "string".to_string(),
        Type::Void => "void".to_string(),
        Type::Named(name, _) => interner.resolve(*name).to_string(),
    }
}
