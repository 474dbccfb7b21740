//! # Control-Flow, Frame, and Stack-Discipline Operations
//!
//! `MOVE`/`DEFVAR`, `CALL`/`RETURN`, `PUSHS`/`POPS`, the `JUMP` family
//! (including the stack-comparing `JUMPIFEQS`/`JUMPIFNEQS`), `EXIT`, and
//! `BREAK`.
//!
//! `JUMPIFEQS`/`JUMPIFNEQS` always pop both compared values off the data
//! stack, even when the branch is not taken — matching
//! `instr_jumpifeqs`/`instr_jumpifneqs` in
//! `examples/original_source/interpret.py`, which never push the operands
//! back regardless of the outcome.

use super::ops_arith::{apply_cmp, CmpKind};
use super::Vm;
use crate::error::InterpError;
use crate::operand::Operand;
use crate::value::Value;

pub(super) fn handle_move(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    let value = vm.resolve(&args[1])?;
    vm.write_var(&args[0], value)
}

pub(super) fn handle_defvar(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    match &args[0] {
        Operand::Var(raw) => {
            let (frame, name) = Vm::var_parts(raw)?;
            vm.frames.define(frame, name)
        }
        _ => Err(InterpError::Semantic("DEFVAR requires a variable operand".to_string())),
    }
}

pub(super) fn handle_call(vm: &mut Vm, args: &[Operand], advance: &mut bool) -> Result<(), InterpError> {
    let target = vm.label_target(&args[0])?;
    vm.call_stack.push(vm.pc);
    vm.pc = target;
    *advance = false;
    Ok(())
}

pub(super) fn handle_return(vm: &mut Vm, _advance: &mut bool) -> Result<(), InterpError> {
    let ret = vm
        .call_stack
        .pop()
        .ok_or_else(|| InterpError::MissingValue("RETURN with an empty call stack".to_string()))?;
    vm.pc = ret;
    Ok(())
}

pub(super) fn handle_pushs(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    let value = vm.resolve(&args[0])?;
    vm.push_stack(value);
    Ok(())
}

pub(super) fn handle_pops(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    let value = vm.pop_stack()?;
    vm.write_var(&args[0], value)
}

pub(super) fn handle_jump(vm: &mut Vm, args: &[Operand], advance: &mut bool) -> Result<(), InterpError> {
    vm.pc = vm.label_target(&args[0])?;
    *advance = false;
    Ok(())
}

pub(super) fn handle_jumpif(
    vm: &mut Vm,
    args: &[Operand],
    advance: &mut bool,
    negate: bool,
) -> Result<(), InterpError> {
    let target = vm.label_target(&args[0])?;
    let a = vm.resolve(&args[1])?;
    let b = vm.resolve(&args[2])?;
    let equal = matches!(apply_cmp(CmpKind::Eq, a, b)?, Value::Bool(true));
    let take = if negate { !equal } else { equal };
    if take {
        vm.pc = target;
        *advance = false;
    }
    Ok(())
}

pub(super) fn handle_jumpifs(
    vm: &mut Vm,
    args: &[Operand],
    advance: &mut bool,
    negate: bool,
) -> Result<(), InterpError> {
    let target = vm.label_target(&args[0])?;
    let b = vm.pop_stack()?;
    let a = vm.pop_stack()?;
    let equal = matches!(apply_cmp(CmpKind::Eq, a, b)?, Value::Bool(true));
    let take = if negate { !equal } else { equal };
    if take {
        vm.pc = target;
        *advance = false;
    }
    Ok(())
}

pub(super) fn handle_exit(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    let value = vm.resolve(&args[0])?;
    match value {
        Value::Int(code) if (0..=49).contains(&code) => Err(InterpError::Exit(code as i32)),
        Value::Int(code) => Err(InterpError::BadNumericDomain(format!(
            "EXIT code {} is out of the 0-49 range",
            code
        ))),
        other => Err(InterpError::TypeMismatch(format!(
            "EXIT requires an int operand, got {}",
            other.type_name()
        ))),
    }
}

pub(super) fn handle_break(vm: &mut Vm) -> Result<(), InterpError> {
    vm.err_out.write_str(&format!(
        "position {}/{}, insts so far, {} frame slot(s) live\n",
        vm.pc,
        vm.instructions.len(),
        vm.frames.live_slot_count()
    ));
    Ok(())
}
