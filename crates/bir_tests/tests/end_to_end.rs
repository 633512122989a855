//! End-to-end scenarios (literal programs -> expected outcomes).

mod support;

use bir_ir::module::{IrInstr, IrTerminator, IrType};
use bir_lang::SemError;
use support::{check_err, compile_ok};

#[test]
fn returns_a_constant_integer() {
    let module = compile_ok("module m\nfunction main(): int { return 42 }\n");
    assert_eq!(module.functions.len(), 1);
    let main = &module.functions[0];
    assert_eq!(main.name, "m_main");
    assert_eq!(main.return_type, IrType::Int64);
    let entry = main.blocks.last().expect("at least one block");
    assert!(matches!(entry.terminator, Some(IrTerminator::Ret(Some(_)))));
    assert!(main.to_string().contains("ret 42"));
}

#[test]
fn struct_method_sums_its_own_fields() {
    let source = "module m\n\
         struct P { x: int y: int }\n\
         implement P { function sum(): int { return this.x + this.y } }\n";
    let module = compile_ok(source);

    assert_eq!(module.structs.len(), 1);
    assert_eq!(module.structs[0].name, "m_P");
    assert_eq!(module.structs[0].fields.len(), 2);
    assert!(module.structs[0].fields.iter().all(|f| *f == IrType::Int64));

    assert_eq!(module.functions.len(), 1);
    let sum = &module.functions[0];
    assert_eq!(sum.name, "m_P_sum");
    assert_eq!(sum.params[0].1, IrType::Ptr(Box::new(IrType::Named("m_P".to_string()))));
    let has_getelementptr = sum.blocks.iter().any(|b| b.instrs.iter().any(|i| matches!(i, IrInstr::GetElementPtr { .. })));
    assert!(has_getelementptr, "field loads should go through getelementptr");
}

#[test]
fn struct_satisfies_interface_by_name_matching_methods() {
    let source = "module m\n\
         interface Shape { function area(): float }\n\
         struct C { r: float }\n\
         implement C { function area(): float { return this.r * this.r } }\n\
         function f(s: Shape): float { return s.area() }\n\
         function g(): float { var c: C; return f(c) }\n";
    let module = compile_ok(source);

    let names: Vec<&str> = module.functions.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"m_C_area"));
    assert!(names.contains(&"m_f"));
    assert!(names.contains(&"m_g"));
}

#[test]
fn returning_bool_from_an_int_function_is_rejected() {
    let err = check_err("module m\nfunction bad(): int { return true }\n");
    assert!(matches!(err, SemError::TypeMismatch { .. }));
}

#[test]
fn adding_an_int_and_a_string_is_rejected() {
    let err = check_err("module m\nfunction a(x: int): int { return x + \"s\" }\n");
    assert!(matches!(err, SemError::TypeMismatch { .. }));
}

#[test]
fn while_loop_lowers_to_header_body_and_exit_blocks() {
    let source = "module m\n\
         function loop(): void { var i: int = 0 while i < 10 { i = i + 1 } }\n";
    let module = compile_ok(source);
    let func = &module.functions[0];
    assert_eq!(func.name, "m_loop");
    assert!(func.blocks.len() >= 3, "expected at least header/body/exit blocks, got {}", func.blocks.len());

    let header = func.blocks.iter().find(|b| b.to_string().contains("icmp slt")).expect("header block with slt compare");
    assert!(matches!(header.terminator, Some(IrTerminator::CondBr { .. })));

    let body_has_increment = func
        .blocks
        .iter()
        .any(|b| b.instrs.iter().any(|i| matches!(i, IrInstr::BinOp { op: bir_ir::module::IrBinOp::IAdd, .. })));
    assert!(body_has_increment);
}
