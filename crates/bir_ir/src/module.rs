//! The in-crate SSA IR: [`IrModule`], [`IrType`], [`IrFunction`], [`IrBlock`],
//! and [`IrInstr`], plus a `.ll`-style textual [`std::fmt::Display`] for each.
//!
//! This is an owned data model, not a binding to LLVM's C API (out of scope
//! per the front end's mandate — downstream assembly/linking is delegated to
//! an external system compiler driver). The textual rendering is deliberately
//! LLVM-flavored so the output reads the way a human familiar with `.ll` IR
//! would expect, without claiming wire compatibility.

use std::fmt;

/// A lowered `bir` type. Struct values are always handled as pointers to a
/// named aggregate (§4.4): there is no distinct "by-value struct" IR type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrType {
    Int64,
    Float64,
    /// `bool`, represented as an 8-bit byte holding 0 or 1.
    Bool8,
    Void,
    /// Opaque byte pointer used for string literals (§9: string operations
    /// beyond equality are undefined in the source language, so no further
    /// structure is modeled here).
    StringPtr,
    Ptr(Box<IrType>),
    /// A named aggregate declared in this module's struct section.
    Named(String),
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Int64 => write!(f, "i64"),
            IrType::Float64 => write!(f, "double"),
            IrType::Bool8 => write!(f, "i8"),
            IrType::Void => write!(f, "void"),
            IrType::StringPtr => write!(f, "i8*"),
            IrType::Ptr(inner) => write!(f, "{inner}*"),
            IrType::Named(name) => write!(f, "%{name}"),
        }
    }
}

/// An SSA register, unique within its defining function, printed as `%N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reg(pub u32);

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// An operand: either a compile-time constant or a previously-defined register.
#[derive(Debug, Clone, PartialEq)]
pub enum IrValue {
    ConstInt(i64),
    ConstFloat(f64),
    ConstBool(bool),
    /// Literal text of a string constant. Emitted as an inline quoted operand
    /// rather than a module-level global — see [`IrType::StringPtr`].
    ConstString(String),
    Reg(Reg),
    /// A reference to one of the enclosing function's named incoming
    /// parameters (printed as `%name`, distinct from the numbered `%N`
    /// registers the emitter assigns to computed values).
    Param(String),
    /// A named function, referenced as a call target or taken by address.
    Function(String),
}

impl fmt::Display for IrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrValue::ConstInt(v) => write!(f, "{v}"),
            IrValue::ConstFloat(v) => write!(f, "{v:?}"),
            IrValue::ConstBool(v) => write!(f, "{}", if *v { 1 } else { 0 }),
            IrValue::ConstString(s) => write!(f, "c{s:?}"),
            IrValue::Reg(r) => write!(f, "{r}"),
            IrValue::Param(name) => write!(f, "%{name}"),
            IrValue::Function(name) => write!(f, "@{name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrBinOp {
    IAdd,
    ISub,
    IMul,
    SDiv,
    FAdd,
    FSub,
    FMul,
    FDiv,
    /// Bitwise AND/OR/XOR over the 8-bit bool representation. AND/OR are
    /// non-short-circuiting (§9 open question: the source leaves
    /// short-circuit semantics unresolved; this mirrors the plain-bitwise
    /// choice made in lowering). XOR backs unary `not` (`x xor 1`).
    And8,
    Or8,
    Xor8,
}

impl fmt::Display for IrBinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IrBinOp::IAdd => "add",
            IrBinOp::ISub => "sub",
            IrBinOp::IMul => "mul",
            IrBinOp::SDiv => "sdiv",
            IrBinOp::FAdd => "fadd",
            IrBinOp::FSub => "fsub",
            IrBinOp::FMul => "fmul",
            IrBinOp::FDiv => "fdiv",
            IrBinOp::And8 => "and",
            IrBinOp::Or8 => "or",
            IrBinOp::Xor8 => "xor",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrIntPred {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
}

impl fmt::Display for IrIntPred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IrIntPred::Eq => "eq",
            IrIntPred::Ne => "ne",
            IrIntPred::Slt => "slt",
            IrIntPred::Sle => "sle",
            IrIntPred::Sgt => "sgt",
            IrIntPred::Sge => "sge",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrFloatPred {
    Oeq,
    One,
    Olt,
    Ole,
    Ogt,
    Oge,
}

impl fmt::Display for IrFloatPred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IrFloatPred::Oeq => "oeq",
            IrFloatPred::One => "one",
            IrFloatPred::Olt => "olt",
            IrFloatPred::Ole => "ole",
            IrFloatPred::Ogt => "ogt",
            IrFloatPred::Oge => "oge",
        };
        write!(f, "{s}")
    }
}

/// A single non-terminating instruction.
#[derive(Debug, Clone)]
pub enum IrInstr {
    Alloca { dst: Reg, ty: IrType },
    Load { dst: Reg, ty: IrType, ptr: IrValue },
    Store { value: IrValue, ptr: IrValue },
    /// `getelementptr` with a single field index, §4.4 rule 3: `(0,
    /// field_index_by_source_order)`.
    GetElementPtr { dst: Reg, base_ty: IrType, ptr: IrValue, field_index: usize },
    BinOp { dst: Reg, ty: IrType, op: IrBinOp, lhs: IrValue, rhs: IrValue },
    ICmp { dst: Reg, pred: IrIntPred, lhs: IrValue, rhs: IrValue },
    FCmp { dst: Reg, pred: IrFloatPred, lhs: IrValue, rhs: IrValue },
    Call { dst: Option<Reg>, ty: IrType, callee: String, args: Vec<IrValue> },
}

impl fmt::Display for IrInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrInstr::Alloca { dst, ty } => write!(f, "  {dst} = alloca {ty}"),
            IrInstr::Load { dst, ty, ptr } => write!(f, "  {dst} = load {ty}, {ptr}"),
            IrInstr::Store { value, ptr } => write!(f, "  store {value}, {ptr}"),
            IrInstr::GetElementPtr { dst, base_ty, ptr, field_index } => {
                write!(f, "  {dst} = getelementptr {base_ty}, {ptr}, i32 0, i32 {field_index}")
            }
            IrInstr::BinOp { dst, ty, op, lhs, rhs } => write!(f, "  {dst} = {op} {ty} {lhs}, {rhs}"),
            IrInstr::ICmp { dst, pred, lhs, rhs } => write!(f, "  {dst} = icmp {pred} {lhs}, {rhs}"),
            IrInstr::FCmp { dst, pred, lhs, rhs } => write!(f, "  {dst} = fcmp {pred} {lhs}, {rhs}"),
            IrInstr::Call { dst, ty, callee, args } => {
                let args = args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ");
                match dst {
                    Some(dst) => write!(f, "  {dst} = call {ty} @{callee}({args})"),
                    None => write!(f, "  call {ty} @{callee}({args})"),
                }
            }
        }
    }
}

/// The single instruction ending a basic block.
#[derive(Debug, Clone)]
pub enum IrTerminator {
    Ret(Option<IrValue>),
    Br(String),
    CondBr { cond: IrValue, then_label: String, else_label: String },
}

impl fmt::Display for IrTerminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrTerminator::Ret(Some(v)) => write!(f, "  ret {v}"),
            IrTerminator::Ret(None) => write!(f, "  ret void"),
            IrTerminator::Br(label) => write!(f, "  br label %{label}"),
            IrTerminator::CondBr { cond, then_label, else_label } => {
                write!(f, "  br {cond}, label %{then_label}, label %{else_label}")
            }
        }
    }
}

/// A maximal straight-line instruction sequence ending in exactly one
/// terminator (§ Glossary). `terminator` is `None` only transiently while the
/// emitter is still appending to the block.
#[derive(Debug, Clone)]
pub struct IrBlock {
    pub label: String,
    pub instrs: Vec<IrInstr>,
    pub terminator: Option<IrTerminator>,
}

impl IrBlock {
    pub fn new(label: impl Into<String>) -> Self {
        IrBlock { label: label.into(), instrs: Vec::new(), terminator: None }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminator.is_some()
    }
}

impl fmt::Display for IrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        for instr in &self.instrs {
            writeln!(f, "{instr}")?;
        }
        if let Some(term) = &self.terminator {
            writeln!(f, "{term}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct IrFunction {
    pub name: String,
    pub params: Vec<(String, IrType)>,
    pub return_type: IrType,
    pub blocks: Vec<IrBlock>,
}

impl fmt::Display for IrFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .params
            .iter()
            .map(|(name, ty)| format!("{ty} %{name}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "define {} @{}({params}) {{", self.return_type, self.name)?;
        for block in &self.blocks {
            write!(f, "{block}")?;
        }
        writeln!(f, "}}")
    }
}

/// A struct type declaration: a name plus fields in source order (§4.4 rule
/// 1 — struct types are nominal, so two structurally identical declarations
/// still produce two distinct `IrType::Named` types).
#[derive(Debug, Clone)]
pub struct IrStructType {
    pub name: String,
    pub fields: Vec<IrType>,
}

impl fmt::Display for IrStructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ");
        write!(f, "%{} = type {{ {} }}", self.name, fields)
    }
}

/// One compiled module's IR: its struct declarations followed by its
/// functions, in source order (E1: one IR function per declared
/// function/method, one IR named type per declared struct).
#[derive(Debug, Clone)]
pub struct IrModule {
    pub name: String,
    pub structs: Vec<IrStructType>,
    pub functions: Vec<IrFunction>,
}

impl IrModule {
    pub fn new(name: impl Into<String>) -> Self {
        IrModule { name: name.into(), structs: Vec::new(), functions: Vec::new() }
    }
}

impl fmt::Display for IrModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; module {}", self.name)?;
        for s in &self.structs {
            writeln!(f, "{s}")?;
        }
        if !self.structs.is_empty() {
            writeln!(f)?;
        }
        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{func}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_type_renders_field_list() {
        let s = IrStructType { name: "m_P".to_string(), fields: vec![IrType::Int64, IrType::Int64] };
        assert_eq!(s.to_string(), "%m_P = type { i64, i64 }");
    }

    #[test]
    fn function_renders_signature_and_blocks() {
        let mut block = IrBlock::new("entry");
        block.instrs.push(IrInstr::Alloca { dst: Reg(0), ty: IrType::Int64 });
        block.terminator = Some(IrTerminator::Ret(Some(IrValue::ConstInt(42))));
        let func = IrFunction {
            name: "m_main".to_string(),
            params: vec![],
            return_type: IrType::Int64,
            blocks: vec![block],
        };
        let rendered = func.to_string();
        assert!(rendered.starts_with("define i64 @m_main() {\n"));
        assert!(rendered.contains("%0 = alloca i64"));
        assert!(rendered.contains("ret 42"));
    }

    #[test]
    fn module_renders_structs_then_functions() {
        let mut module = IrModule::new("m");
        module.structs.push(IrStructType { name: "m_P".to_string(), fields: vec![IrType::Int64] });
        module.functions.push(IrFunction {
            name: "m_main".to_string(),
            params: vec![],
            return_type: IrType::Void,
            blocks: vec![{
                let mut b = IrBlock::new("entry");
                b.terminator = Some(IrTerminator::Ret(None));
                b
            }],
        });
        let rendered = module.to_string();
        assert!(rendered.contains("; module m"));
        assert!(rendered.contains("%m_P = type { i64 }"));
        assert!(rendered.contains("define void @m_main"));
    }
}
