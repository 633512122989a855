//! Tree-walking IR emitter (§4.4): lowers one checked [`Program`] into one
//! [`IrModule`], mirroring the three-stage split (lex, parse, check) with a
//! fourth stage that only ever runs after a successful check.
//!
//! Locals (parameters, `this`, and `var`/`const`/`for`-bound names) are
//! resolved through the emitter's own lexically-scoped name table rather
//! than the checker's [`SymbolId`]s, the same way the source compiler keeps
//! a separate symbol-table stack during code generation: the checker's
//! per-body bindings are allocated fresh on every checked function and
//! never persisted past that one call, so there is nothing durable to key
//! on. Struct members, free functions, and constructors *are* durable
//! (their `SymbolId`s live in the module's top-level table and its struct
//! member tables for the run's whole lifetime) and are resolved through the
//! back-annotated `SymbolSlot`s the checker already filled in.

use std::collections::HashMap;

use bir_base::{Interner, Position, Symbol};
use bir_lang::ast::{BinaryOp, ElseBranch, Expr, ExprRef, Item, Param, Program, Stmt, StmtRef, Type, UnaryOp};
use bir_lang::sema::{module_name, CheckedUnit};
use bir_lang::symbol::{SymbolArena, SymbolId, SymbolKind};

use crate::error::EmitError;
use crate::module::{
    IrBinOp, IrBlock, IrFloatPred, IrFunction, IrInstr, IrIntPred, IrModule, IrStructType, IrTerminator, IrType, IrValue, Reg,
};

/// Lowers one already-checked module named by `module_index` into its own
/// [`IrModule`]. `programs` is the same slice, in the same order, that was
/// passed to [`bir_lang::sema::check`] to produce `checked` — every module
/// needs its siblings in scope so an imported alias's constant or function
/// can be resolved and mangled under its *owning* module's name rather than
/// the referrer's (§4.4 rule 2).
pub fn emit_program(programs: &[Program<'_>], module_index: usize, checked: &CheckedUnit, interner: &Interner) -> Result<IrModule, EmitError> {
    let program = &programs[module_index];
    let name = module_name(&program.module.path, interner);
    let top_level = &checked.modules[module_index].top_level;
    let mut module = IrModule::new(name.clone());

    // Built across every module, not just this one: an `alias.CONST` read
    // resolves (via pass C) to the owning module's top-level `SymbolId`, and
    // `SymbolId`s are unique across the whole arena, so one global map
    // safely covers both local and imported constants.
    let mut consts: HashMap<SymbolId, IrValue> = HashMap::new();
    for (index, prog) in programs.iter().enumerate() {
        let prog_top_level = &checked.modules[index].top_level;
        for item in &prog.items {
            if let Item::Const(constant) = item {
                let id = prog_top_level.get(constant.name).expect("const registered by pass B");
                consts.insert(id, literal_value(constant.value, interner));
            }
        }
    }

    for item in &program.items {
        if let Item::Struct(s) = item {
            let struct_id = top_level.get(s.name).expect("struct registered by pass A");
            module.structs.push(lower_struct(&name, s.name, struct_id, &checked.arena, interner));
        }
    }

    for item in &program.items {
        match item {
            Item::Function(function) => {
                let func_id = function.symbol.get().expect("function resolved by pass B");
                let sig = checked.arena.get(func_id).signature.clone().expect("function has a signature");
                let mangled = format!("{name}_{}", interner.resolve(function.name));
                let mut emitter = FunctionEmitter::new(&name, module_index, checked, interner, &consts);
                module.functions.push(emitter.emit_function(
                    mangled,
                    None,
                    &function.params,
                    &sig.return_type,
                    function.body,
                )?);
            }
            Item::Implement(impl_block) => {
                let struct_id = top_level.get(impl_block.name).expect("struct registered by pass A");
                let this_ty = Type::Named(impl_block.name, Vec::new());
                for method in &impl_block.methods {
                    let method_id = method.symbol.get().expect("method resolved by pass B");
                    let sig = checked.arena.get(method_id).signature.clone().expect("method has a signature");
                    let mangled =
                        format!("{name}_{}_{}", interner.resolve(impl_block.name), interner.resolve(method.name));
                    let mut emitter = FunctionEmitter::new(&name, module_index, checked, interner, &consts);
                    module.functions.push(emitter.emit_function(
                        mangled,
                        Some(this_ty.clone()),
                        &method.params,
                        &sig.return_type,
                        method.body,
                    )?);
                }
                if let Some(ctor) = &impl_block.constructor {
                    let ctor_id = checked.arena.get(struct_id).constructor.expect("constructor registered by pass B");
                    let sig = checked.arena.get(ctor_id).signature.clone().expect("constructor has a signature");
                    let mangled = format!("{name}_{}_init", interner.resolve(impl_block.name));
                    let mut emitter = FunctionEmitter::new(&name, module_index, checked, interner, &consts);
                    module.functions.push(emitter.emit_function(
                        mangled,
                        Some(this_ty),
                        &ctor.params,
                        &sig.return_type,
                        ctor.body,
                    )?);
                }
            }
            Item::Struct(_) | Item::Interface(_) | Item::Const(_) => {}
        }
    }

    Ok(module)
}

fn literal_value(expr: ExprRef<'_>, interner: &Interner) -> IrValue {
    match expr {
        Expr::IntLit(v, _) => IrValue::ConstInt(*v),
        Expr::FloatLit(v, _) => IrValue::ConstFloat(*v),
        Expr::BoolLit(v, _) => IrValue::ConstBool(*v),
        Expr::StringLit(sym, _) => IrValue::ConstString(interner.resolve(*sym).to_string()),
        _ => unreachable!("const values are restricted to literals by the parser"),
    }
}

fn lower_type(ty: &Type, module_name: &str, interner: &Interner) -> IrType {
    match ty {
        Type::Int => IrType::Int64,
        Type::Float => IrType::Float64,
        Type::Bool => IrType::Bool8,
        Type::String => IrType::StringPtr,
        Type::Void => IrType::Void,
        Type::Named(name, _) => IrType::Ptr(Box::new(IrType::Named(format!("{module_name}_{}", interner.resolve(*name))))),
    }
}

/// Recovers a struct's field list in source order, filtering out methods —
/// pass B inserts fields and `implement`-block methods into the same member
/// table, so only the `Variable`-kind entries are fields.
fn lower_struct(module_name: &str, name: Symbol, struct_id: SymbolId, arena: &SymbolArena, interner: &Interner) -> IrStructType {
    let entry = arena.get(struct_id);
    let members = entry.members.as_ref().expect("struct has a member table");
    let fields = members
        .names_in_order()
        .iter()
        .filter_map(|field_name| {
            let field_id = members.get(*field_name).expect("present");
            let field_entry = arena.get(field_id);
            if field_entry.kind != SymbolKind::Variable {
                return None;
            }
            Some(lower_type(field_entry.ty.as_ref().expect("field has a type"), module_name, interner))
        })
        .collect();
    IrStructType { name: format!("{module_name}_{}", interner.resolve(name)), fields }
}

/// One local binding: where it lives (a pointer register from an `alloca`)
/// and its declared `bir` type (needed to pick the right `load`/field
/// lookups at each use site).
type LocalScope = HashMap<Symbol, (Reg, Type)>;

struct FunctionEmitter<'a> {
    module_name: &'a str,
    module_index: usize,
    checked: &'a CheckedUnit,
    interner: &'a Interner,
    consts: &'a HashMap<SymbolId, IrValue>,
    reg_counter: u32,
    label_counter: u32,
    blocks: Vec<IrBlock>,
    current: usize,
    scopes: Vec<LocalScope>,
}

impl<'a> FunctionEmitter<'a> {
    fn new(
        module_name: &'a str,
        module_index: usize,
        checked: &'a CheckedUnit,
        interner: &'a Interner,
        consts: &'a HashMap<SymbolId, IrValue>,
    ) -> Self {
        FunctionEmitter {
            module_name,
            module_index,
            checked,
            interner,
            consts,
            reg_counter: 0,
            label_counter: 0,
            blocks: Vec::new(),
            current: 0,
            scopes: vec![HashMap::new()],
        }
    }

    fn lower(&self, ty: &Type) -> IrType {
        lower_type(ty, self.module_name, self.interner)
    }

    fn new_reg(&mut self) -> Reg {
        let r = Reg(self.reg_counter);
        self.reg_counter += 1;
        r
    }

    fn new_label(&mut self, prefix: &str) -> String {
        let n = self.label_counter;
        self.label_counter += 1;
        format!("{prefix}{n}")
    }

    fn open_block(&mut self, label: impl Into<String>) -> usize {
        self.blocks.push(IrBlock::new(label));
        self.blocks.len() - 1
    }

    fn push_instr(&mut self, instr: IrInstr) {
        self.blocks[self.current].instrs.push(instr);
    }

    fn is_terminated(&self) -> bool {
        self.blocks[self.current].is_terminated()
    }

    fn terminate(&mut self, term: IrTerminator) {
        if !self.is_terminated() {
            self.blocks[self.current].terminator = Some(term);
        }
    }

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn bind(&mut self, name: Symbol, reg: Reg, ty: Type) {
        self.scopes.last_mut().expect("at least one scope").insert(name, (reg, ty));
    }

    fn lookup_local(&self, name: Symbol) -> Option<(Reg, Type)> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&name).cloned())
    }

    /// Finds the mangled name prefix of the module whose top-level table
    /// owns `id`. A struct's field/method ids never appear in a top-level
    /// table (only the struct/interface/function/const names declared
    /// directly in a module do), so a hit here always means `id` is a
    /// plain top-level symbol — reached either directly or through an
    /// import alias — rather than a field access on a struct value.
    fn owning_module_name(&self, id: SymbolId) -> Option<String> {
        self.checked
            .modules
            .iter()
            .find(|info| info.top_level.names_in_order().iter().any(|name| info.top_level.get(*name) == Some(id)))
            .map(|info| module_name(&info.path, self.interner))
    }

    /// Allocates storage for an incoming named parameter and stores its
    /// value, so parameters are read through `load`/`store` the same as any
    /// other local (§4.4 rule: "variable access via alloca/load/store").
    fn bind_param(&mut self, name: Symbol, text: &str, ty: &Type) -> (String, IrType) {
        let ir_ty = self.lower(ty);
        let reg = self.new_reg();
        self.push_instr(IrInstr::Alloca { dst: reg, ty: ir_ty.clone() });
        self.push_instr(IrInstr::Store { value: IrValue::Param(text.to_string()), ptr: IrValue::Reg(reg) });
        self.bind(name, reg, ty.clone());
        (text.to_string(), ir_ty)
    }

    fn emit_function(
        &mut self,
        mangled_name: String,
        this_ty: Option<Type>,
        params: &[Param],
        return_type: &Type,
        body: &[StmtRef<'_>],
    ) -> Result<IrFunction, EmitError> {
        let entry = self.open_block("entry");
        self.current = entry;

        let mut ir_params = Vec::new();
        if let Some(this_ty) = &this_ty {
            let ir_ty = self.lower(this_ty);
            ir_params.push(("this".to_string(), ir_ty.clone()));
            let reg = self.new_reg();
            self.push_instr(IrInstr::Alloca { dst: reg, ty: ir_ty.clone() });
            self.push_instr(IrInstr::Store { value: IrValue::Param("this".to_string()), ptr: IrValue::Reg(reg) });
            if let Some(this_sym) = self.interner.lookup("this") {
                self.bind(this_sym, reg, this_ty.clone());
            }
        }
        for param in params {
            let text = self.interner.resolve(param.name).to_string();
            let pair = self.bind_param(param.name, &text, &param.ty);
            ir_params.push(pair);
        }

        self.emit_block(body)?;
        if !self.is_terminated() {
            self.terminate(IrTerminator::Ret(None));
        }

        Ok(IrFunction {
            name: mangled_name,
            params: ir_params,
            return_type: self.lower(return_type),
            blocks: std::mem::take(&mut self.blocks),
        })
    }

    /// Walks a statement list in its own lexical scope, restoring the outer
    /// scope on exit (mirrors the checker's `scope.truncate_to`).
    fn emit_block(&mut self, stmts: &[StmtRef<'_>]) -> Result<(), EmitError> {
        self.push_scope();
        let result = self.emit_stmts(stmts);
        self.pop_scope();
        result
    }

    fn emit_stmts(&mut self, stmts: &[StmtRef<'_>]) -> Result<(), EmitError> {
        for stmt in stmts {
            if self.is_terminated() {
                break;
            }
            self.emit_stmt(stmt)?;
        }
        Ok(())
    }

    fn emit_stmt(&mut self, stmt: StmtRef<'_>) -> Result<(), EmitError> {
        match stmt {
            Stmt::VarDecl { name, ty, init, .. } => {
                let declared = match ty.clone() {
                    Some(t) => t,
                    None => self.type_of(init.expect("var without type needs an initializer")),
                };
                let ir_ty = self.lower(&declared);
                let reg = self.new_reg();
                self.push_instr(IrInstr::Alloca { dst: reg, ty: ir_ty });
                if let Some(value) = init.map(|e| self.emit_expr(e)).transpose()? {
                    self.push_instr(IrInstr::Store { value, ptr: IrValue::Reg(reg) });
                }
                self.bind(*name, reg, declared);
                Ok(())
            }
            Stmt::ConstDecl { name, ty, value, .. } => {
                let declared = ty.clone().unwrap_or_else(|| self.type_of(*value));
                let ir_ty = self.lower(&declared);
                let reg = self.new_reg();
                self.push_instr(IrInstr::Alloca { dst: reg, ty: ir_ty });
                let val = self.emit_expr(*value)?;
                self.push_instr(IrInstr::Store { value: val, ptr: IrValue::Reg(reg) });
                self.bind(*name, reg, declared);
                Ok(())
            }
            Stmt::If { cond, then_block, else_branch, .. } => self.emit_if(*cond, *then_block, else_branch.as_ref()),
            Stmt::While { cond, body, else_block, .. } => self.emit_while(*cond, *body, *else_block),
            Stmt::For { var, ty, iterable, body, .. } => {
                // `for` has no defined iteration protocol in the source
                // language (§9 open question); the iterable is evaluated
                // once for its side effects/name resolution and the body
                // runs exactly once, the same conservative reading pass_c
                // uses when type-checking it.
                self.emit_expr(*iterable)?;
                self.push_scope();
                if let Some(declared) = ty {
                    let ir_ty = self.lower(declared);
                    let reg = self.new_reg();
                    self.push_instr(IrInstr::Alloca { dst: reg, ty: ir_ty });
                    self.bind(*var, reg, declared.clone());
                }
                let result = self.emit_stmts(*body);
                self.pop_scope();
                result
            }
            Stmt::With { expr, body, .. } => {
                self.emit_expr(*expr)?;
                if let Some(block) = *body {
                    self.emit_block(block)?;
                }
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = value.map(|v| self.emit_expr(v)).transpose()?;
                self.terminate(IrTerminator::Ret(value));
                Ok(())
            }
            Stmt::Assignment { target, value, .. } => {
                let val = self.emit_expr(*value)?;
                let (ptr, _) = self.emit_place(*target)?;
                self.push_instr(IrInstr::Store { value: val, ptr });
                Ok(())
            }
            Stmt::ExprStmt { expr, .. } => {
                self.emit_expr(*expr)?;
                Ok(())
            }
        }
    }

    fn emit_if(
        &mut self,
        cond: ExprRef<'_>,
        then_block: &[StmtRef<'_>],
        else_branch: Option<&ElseBranch<'_>>,
    ) -> Result<(), EmitError> {
        let cond_val = self.emit_expr(cond)?;
        let then_label = self.new_label("if.then");
        let else_label = self.new_label("if.else");
        let exit_label = self.new_label("if.exit");

        let target_else = if else_branch.is_some() { else_label.clone() } else { exit_label.clone() };
        self.terminate(IrTerminator::CondBr { cond: cond_val, then_label: then_label.clone(), else_label: target_else });

        let then_idx = self.open_block(then_label);
        self.current = then_idx;
        self.emit_block(then_block)?;
        self.terminate(IrTerminator::Br(exit_label.clone()));

        if let Some(branch) = else_branch {
            let else_idx = self.open_block(else_label);
            self.current = else_idx;
            match branch {
                ElseBranch::Block(stmts) => self.emit_block(*stmts)?,
                ElseBranch::If(stmt) => self.emit_stmt(*stmt)?,
            }
            self.terminate(IrTerminator::Br(exit_label.clone()));
        }

        let exit_idx = self.open_block(exit_label);
        self.current = exit_idx;
        Ok(())
    }

    fn emit_while(&mut self, cond: ExprRef<'_>, body: &[StmtRef<'_>], else_block: Option<&[StmtRef<'_>]>) -> Result<(), EmitError> {
        let header_label = self.new_label("while.header");
        let body_label = self.new_label("while.body");
        let else_label = self.new_label("while.else");
        let exit_label = self.new_label("while.exit");

        self.terminate(IrTerminator::Br(header_label.clone()));

        let header_idx = self.open_block(header_label.clone());
        self.current = header_idx;
        let cond_val = self.emit_expr(cond)?;
        let false_target = if else_block.is_some() { else_label.clone() } else { exit_label.clone() };
        self.terminate(IrTerminator::CondBr { cond: cond_val, then_label: body_label.clone(), else_label: false_target });

        let body_idx = self.open_block(body_label);
        self.current = body_idx;
        self.emit_block(body)?;
        self.terminate(IrTerminator::Br(header_label));

        if let Some(block) = else_block {
            let else_idx = self.open_block(else_label);
            self.current = else_idx;
            self.emit_block(block)?;
            self.terminate(IrTerminator::Br(exit_label.clone()));
        }

        let exit_idx = self.open_block(exit_label);
        self.current = exit_idx;
        Ok(())
    }

    /// Resolves an expression to an addressable storage location: the
    /// register holding a pointer to it, plus its `bir` type. Used by
    /// assignment targets and as the `this`/object argument of method calls.
    fn emit_place(&mut self, expr: ExprRef<'_>) -> Result<(IrValue, Type), EmitError> {
        match expr {
            Expr::Variable(name, position, slot) => {
                if let Some((reg, ty)) = self.lookup_local(*name) {
                    return Ok((IrValue::Reg(reg), ty));
                }
                let _ = slot.get().ok_or_else(|| EmitError::UnresolvedSymbol {
                    name: self.interner.resolve(*name).to_string(),
                    position: *position,
                })?;
                Err(EmitError::NotAddressable { name: self.interner.resolve(*name).to_string(), position: *position })
            }
            Expr::MemberAccess(obj, member, position, slot) => {
                let (obj_ptr, obj_ty) = self.emit_place(*obj)?;
                let Type::Named(struct_name, _) = obj_ty else {
                    return Err(EmitError::MissingMemberTable { name: self.interner.resolve(*member).to_string(), position: *position });
                };
                let member_id = slot.get().ok_or_else(|| EmitError::UnresolvedSymbol {
                    name: self.interner.resolve(*member).to_string(),
                    position: *position,
                })?;
                let field_index = self.field_index(struct_name, member_id);
                let base_ty = match self.lower(&Type::Named(struct_name, Vec::new())) {
                    IrType::Ptr(inner) => *inner,
                    other => other,
                };
                let field_ty = self.checked.arena.get(member_id).ty.clone().unwrap_or(Type::Void);
                let dst = self.new_reg();
                self.push_instr(IrInstr::GetElementPtr { dst, base_ty, ptr: obj_ptr, field_index });
                Ok((IrValue::Reg(dst), field_ty))
            }
            _ => unreachable!("assignment targets are restricted to variables and member access by pass C"),
        }
    }

    /// Position of `field_id` among `struct_name`'s *fields* (methods
    /// sharing the same member table are excluded, §4.4 rule 3).
    fn field_index(&self, struct_name: Symbol, field_id: SymbolId) -> usize {
        let top_level = &self.checked.modules[self.module_index].top_level;
        let Some(struct_id) = top_level.get(struct_name) else {
            return 0;
        };
        let entry = self.checked.arena.get(struct_id);
        let members = entry.members.as_ref().expect("struct has a member table");
        members
            .names_in_order()
            .iter()
            .filter_map(|name| members.get(*name))
            .filter(|id| self.checked.arena.get(*id).kind == SymbolKind::Variable)
            .position(|id| id == field_id)
            .unwrap_or(0)
    }

    fn emit_expr(&mut self, expr: ExprRef<'_>) -> Result<IrValue, EmitError> {
        match expr {
            Expr::IntLit(v, _) => Ok(IrValue::ConstInt(*v)),
            Expr::FloatLit(v, _) => Ok(IrValue::ConstFloat(*v)),
            Expr::BoolLit(v, _) => Ok(IrValue::ConstBool(*v)),
            Expr::StringLit(sym, _) => Ok(IrValue::ConstString(self.interner.resolve(*sym).to_string())),
            Expr::Variable(name, position, slot) => {
                if let Some((reg, ty)) = self.lookup_local(*name) {
                    let ir_ty = self.lower(&ty);
                    let dst = self.new_reg();
                    self.push_instr(IrInstr::Load { dst, ty: ir_ty, ptr: IrValue::Reg(reg) });
                    return Ok(IrValue::Reg(dst));
                }
                let id = slot.get().ok_or_else(|| EmitError::UnresolvedSymbol {
                    name: self.interner.resolve(*name).to_string(),
                    position: *position,
                })?;
                if let Some(value) = self.consts.get(&id) {
                    return Ok(value.clone());
                }
                Err(EmitError::UnresolvedSymbol { name: self.interner.resolve(*name).to_string(), position: *position })
            }
            Expr::Binary(op, lhs, rhs, position) => self.emit_binary(*op, *lhs, *rhs, *position),
            Expr::Unary(UnaryOp::Not, operand, _) => {
                let val = self.emit_expr(*operand)?;
                let dst = self.new_reg();
                self.push_instr(IrInstr::BinOp { dst, ty: IrType::Bool8, op: IrBinOp::Xor8, lhs: val, rhs: IrValue::ConstBool(true) });
                Ok(IrValue::Reg(dst))
            }
            Expr::Call(callee, args, position) => self.emit_call(*callee, args.as_slice(), *position),
            Expr::MemberAccess(_, _, _, slot) => {
                // `alias.CONST` (an import alias's top-level constant) is
                // inlined straight from the global consts map, the same as
                // a same-module const read: it has no struct instance
                // behind it, so it is never addressable via `emit_place`.
                if let Some(id) = slot.get() {
                    if let Some(value) = self.consts.get(&id) {
                        return Ok(value.clone());
                    }
                }
                let (ptr, field_ty) = self.emit_place(expr)?;
                let ir_ty = self.lower(&field_ty);
                let dst = self.new_reg();
                self.push_instr(IrInstr::Load { dst, ty: ir_ty, ptr });
                Ok(IrValue::Reg(dst))
            }
            Expr::Index(_, _, position) => Err(EmitError::Unsupported { what: "index expressions".to_string(), position: *position }),
            Expr::As(inner, _, _) => self.emit_expr(*inner),
        }
    }

    fn emit_binary(&mut self, op: BinaryOp, lhs: ExprRef<'_>, rhs: ExprRef<'_>, _position: Position) -> Result<IrValue, EmitError> {
        let lhs_ty = self.type_of(lhs);
        let lhs_val = self.emit_expr(lhs)?;
        let rhs_val = self.emit_expr(rhs)?;
        let is_float = matches!(lhs_ty, Type::Float);

        let dst = self.new_reg();
        match op {
            BinaryOp::Add if is_float => {
                self.push_instr(IrInstr::BinOp { dst, ty: IrType::Float64, op: IrBinOp::FAdd, lhs: lhs_val, rhs: rhs_val });
            }
            BinaryOp::Add => {
                self.push_instr(IrInstr::BinOp { dst, ty: IrType::Int64, op: IrBinOp::IAdd, lhs: lhs_val, rhs: rhs_val });
            }
            BinaryOp::Sub if is_float => {
                self.push_instr(IrInstr::BinOp { dst, ty: IrType::Float64, op: IrBinOp::FSub, lhs: lhs_val, rhs: rhs_val });
            }
            BinaryOp::Sub => {
                self.push_instr(IrInstr::BinOp { dst, ty: IrType::Int64, op: IrBinOp::ISub, lhs: lhs_val, rhs: rhs_val });
            }
            BinaryOp::Mul if is_float => {
                self.push_instr(IrInstr::BinOp { dst, ty: IrType::Float64, op: IrBinOp::FMul, lhs: lhs_val, rhs: rhs_val });
            }
            BinaryOp::Mul => {
                self.push_instr(IrInstr::BinOp { dst, ty: IrType::Int64, op: IrBinOp::IMul, lhs: lhs_val, rhs: rhs_val });
            }
            BinaryOp::Div if is_float => {
                self.push_instr(IrInstr::BinOp { dst, ty: IrType::Float64, op: IrBinOp::FDiv, lhs: lhs_val, rhs: rhs_val });
            }
            BinaryOp::Div => {
                self.push_instr(IrInstr::BinOp { dst, ty: IrType::Int64, op: IrBinOp::SDiv, lhs: lhs_val, rhs: rhs_val });
            }
            // Non-short-circuiting: plain bitwise ops over the 8-bit bool
            // representation (§9 open question on short-circuit evaluation).
            BinaryOp::And => {
                self.push_instr(IrInstr::BinOp { dst, ty: IrType::Bool8, op: IrBinOp::And8, lhs: lhs_val, rhs: rhs_val });
            }
            BinaryOp::Or => {
                self.push_instr(IrInstr::BinOp { dst, ty: IrType::Bool8, op: IrBinOp::Or8, lhs: lhs_val, rhs: rhs_val });
            }
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq if is_float => {
                let pred = match op {
                    BinaryOp::Eq => IrFloatPred::Oeq,
                    BinaryOp::NotEq => IrFloatPred::One,
                    BinaryOp::Lt => IrFloatPred::Olt,
                    BinaryOp::LtEq => IrFloatPred::Ole,
                    BinaryOp::Gt => IrFloatPred::Ogt,
                    BinaryOp::GtEq => IrFloatPred::Oge,
                    _ => unreachable!(),
                };
                self.push_instr(IrInstr::FCmp { dst, pred, lhs: lhs_val, rhs: rhs_val });
            }
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                let pred = match op {
                    BinaryOp::Eq => IrIntPred::Eq,
                    BinaryOp::NotEq => IrIntPred::Ne,
                    BinaryOp::Lt => IrIntPred::Slt,
                    BinaryOp::LtEq => IrIntPred::Sle,
                    BinaryOp::Gt => IrIntPred::Sgt,
                    BinaryOp::GtEq => IrIntPred::Sge,
                    _ => unreachable!(),
                };
                self.push_instr(IrInstr::ICmp { dst, pred, lhs: lhs_val, rhs: rhs_val });
            }
        }
        Ok(IrValue::Reg(dst))
    }

    fn emit_call(&mut self, callee: ExprRef<'_>, args: &[ExprRef<'_>], position: Position) -> Result<IrValue, EmitError> {
        match callee {
            Expr::Variable(name, _, slot) => {
                let id = slot.get().ok_or_else(|| EmitError::UnresolvedSymbol {
                    name: self.interner.resolve(*name).to_string(),
                    position,
                })?;
                let entry = self.checked.arena.get(id);
                match entry.kind {
                    SymbolKind::Struct => {
                        // Constructor call: allocate the new instance and
                        // thread its address as the implicit `this`.
                        let pointee = match self.lower(&Type::Named(*name, Vec::new())) {
                            IrType::Ptr(inner) => *inner,
                            other => other,
                        };
                        let instance = self.new_reg();
                        self.push_instr(IrInstr::Alloca { dst: instance, ty: pointee });
                        let mut call_args = vec![IrValue::Reg(instance)];
                        for arg in args {
                            call_args.push(self.emit_expr(*arg)?);
                        }
                        let mangled = format!("{}_{}_init", self.module_name, self.interner.resolve(*name));
                        self.push_instr(IrInstr::Call { dst: None, ty: IrType::Void, callee: mangled, args: call_args });
                        Ok(IrValue::Reg(instance))
                    }
                    SymbolKind::Function => {
                        let return_type = entry.signature.as_ref().expect("function has a signature").return_type.clone();
                        let ir_ret = self.lower(&return_type);
                        let mut call_args = Vec::with_capacity(args.len());
                        for arg in args {
                            call_args.push(self.emit_expr(*arg)?);
                        }
                        let mangled = format!("{}_{}", self.module_name, self.interner.resolve(*name));
                        self.emit_call_instr(ir_ret, mangled, call_args)
                    }
                    _ => Err(EmitError::Unsupported { what: format!("calling '{}'", self.interner.resolve(*name)), position }),
                }
            }
            Expr::MemberAccess(obj, member, _, slot) => {
                let method_id = slot.get().ok_or_else(|| EmitError::UnresolvedSymbol {
                    name: self.interner.resolve(*member).to_string(),
                    position,
                })?;
                let entry = self.checked.arena.get(method_id);
                let sig = entry.signature.as_ref().expect("callee has a signature");
                let ir_ret = self.lower(&sig.return_type);

                if !sig.has_self {
                    // A free function reached through an import alias
                    // (`alias.func(...)`): no `this` argument, and `obj` is
                    // the alias marker itself, never addressable — mangle
                    // with the function's *owning* module, not `self.module_name`.
                    let owner = self.owning_module_name(method_id).unwrap_or_else(|| self.module_name.to_string());
                    let mut call_args = Vec::with_capacity(args.len());
                    for arg in args {
                        call_args.push(self.emit_expr(*arg)?);
                    }
                    let mangled = format!("{owner}_{}", self.interner.resolve(*member));
                    return self.emit_call_instr(ir_ret, mangled, call_args);
                }

                let (this_ptr, obj_ty) = self.emit_place(*obj)?;
                let Type::Named(struct_name, _) = obj_ty else {
                    return Err(EmitError::MissingMemberTable { name: self.interner.resolve(*member).to_string(), position });
                };
                let mut call_args = vec![this_ptr];
                for arg in args {
                    call_args.push(self.emit_expr(*arg)?);
                }
                // Unlike a free function, a method's id lives in its
                // struct's member table, never a module's top-level table
                // (`owning_module_name` would always miss), and the type
                // grammar has no dotted path to name a struct from another
                // module in the first place — `struct_name` is always
                // resolved against the caller's own module.
                let mangled = format!("{}_{}_{}", self.module_name, self.interner.resolve(struct_name), self.interner.resolve(*member));
                self.emit_call_instr(ir_ret, mangled, call_args)
            }
            _ => Err(EmitError::Unsupported { what: "indirect calls".to_string(), position }),
        }
    }

    fn emit_call_instr(&mut self, ir_ret: IrType, callee: String, args: Vec<IrValue>) -> Result<IrValue, EmitError> {
        if matches!(ir_ret, IrType::Void) {
            self.push_instr(IrInstr::Call { dst: None, ty: ir_ret, callee, args });
            Ok(IrValue::ConstInt(0))
        } else {
            let dst = self.new_reg();
            self.push_instr(IrInstr::Call { dst: Some(dst), ty: ir_ret, callee, args });
            Ok(IrValue::Reg(dst))
        }
    }

    /// A minimal re-derivation of an expression's static type, used only for
    /// picking arithmetic opcodes and default types for untyped `var`/`const`
    /// declarations. Not a second type checker: every expression here has
    /// already passed pass C, so this never needs to reject anything.
    fn type_of(&self, expr: ExprRef<'_>) -> Type {
        match expr {
            Expr::IntLit(..) => Type::Int,
            Expr::FloatLit(..) => Type::Float,
            Expr::BoolLit(..) => Type::Bool,
            Expr::StringLit(..) => Type::String,
            Expr::Variable(name, _, slot) => {
                if let Some((_, ty)) = self.lookup_local(*name) {
                    return ty;
                }
                slot.get().and_then(|id| self.checked.arena.get(id).ty.clone()).unwrap_or(Type::Void)
            }
            Expr::Binary(op, lhs, _, _) => match op {
                BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => Type::Bool,
                BinaryOp::And | BinaryOp::Or => Type::Bool,
                _ => self.type_of(*lhs),
            },
            Expr::Unary(UnaryOp::Not, _, _) => Type::Bool,
            Expr::Call(callee, _, _) => match *callee {
                Expr::Variable(name, _, slot) => slot
                    .get()
                    .map(|id| {
                        let entry = self.checked.arena.get(id);
                        match entry.kind {
                            SymbolKind::Struct => Type::Named(*name, Vec::new()),
                            _ => entry.signature.as_ref().map(|s| s.return_type.clone()).unwrap_or(Type::Void),
                        }
                    })
                    .unwrap_or(Type::Void),
                Expr::MemberAccess(_, _, _, slot) => slot
                    .get()
                    .and_then(|id| self.checked.arena.get(id).signature.as_ref().map(|s| s.return_type.clone()))
                    .unwrap_or(Type::Void),
                _ => Type::Void,
            },
            Expr::MemberAccess(_, _, _, slot) => slot.get().and_then(|id| self.checked.arena.get(id).ty.clone()).unwrap_or(Type::Void),
            Expr::Index(arr, _, _) => self.type_of(*arr),
            Expr::As(_, ty, _) => ty.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bir_lang::lexer::Lexer;
    use bir_lang::parser::{AstArenas, Parser};
    use bir_lang::sema;

    fn compile(source: &str) -> IrModule {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new(source, &mut interner);
        let tokens = lexer.tokenize().expect("lex");
        let arenas = AstArenas::new();
        let mut parser = Parser::new(tokens, &interner, &arenas);
        let program = parser.parse_program().expect("parse");
        let checked = sema::check(std::slice::from_ref(&program), &interner).expect("check");
        emit_program(std::slice::from_ref(&program), 0, &checked, &interner).expect("emit")
    }

    #[test]
    fn emits_one_function_per_free_function() {
        let module = compile("module m\nfunction add(a: int, b: int): int {\n  return a + b\n}\n");
        assert_eq!(module.functions.len(), 1);
        assert_eq!(module.functions[0].name, "m_add");
        let rendered = module.to_string();
        assert!(rendered.contains("define i64 @m_add(i64 %a, i64 %b)"));
        assert!(rendered.contains("ret %"));
    }

    #[test]
    fn emits_struct_type_with_fields_in_source_order() {
        let module = compile("module m\nstruct P {\n  x: int\n  y: int\n}\n");
        assert_eq!(module.structs.len(), 1);
        assert_eq!(module.structs[0].name, "m_P");
        assert_eq!(module.structs[0].fields, vec![IrType::Int64, IrType::Int64]);
    }

    #[test]
    fn if_without_else_branches_straight_to_exit() {
        let module = compile("module m\nfunction f(a: bool): int {\n  if a {\n    return 1\n  }\n  return 0\n}\n");
        let rendered = module.to_string();
        assert!(rendered.contains("if.then0:"));
        assert!(rendered.contains("if.exit0:"));
    }

    #[test]
    fn while_loop_branches_through_header_and_body() {
        let module = compile("module m\nfunction f(): int {\n  var i: int = 0\n  while i < 10 {\n    i = i + 1\n  }\n  return i\n}\n");
        let rendered = module.to_string();
        assert!(rendered.contains("while.header0:"));
        assert!(rendered.contains("while.body0:"));
        assert!(rendered.contains("while.exit0:"));
    }
}
