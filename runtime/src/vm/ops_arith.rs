//! # Arithmetic, Relational, and Boolean Operations
//!
//! Implements `ADD`/`SUB`/`MUL`/`DIV`/`IDIV`, `LT`/`GT`/`EQ`, and
//! `AND`/`OR`/`NOT`, plus their `*S` stack-form counterparts. Non-stack
//! forms read two `symb` operands and write a `var` destination; stack
//! forms pop their operands from the data stack and push the result back
//! onto it.
//!
//! `ADD`/`SUB`/`MUL` accept either two ints or two floats; `DIV` is float
//! division only; `IDIV` is integer division only. The stack forms
//! `ADDS`/`SUBS`/`MULS`/`IDIVS` are narrower than their non-stack
//! counterparts: they require two integer operands, matching the
//! reference runtime's own stack-arithmetic handlers in
//! `examples/original_source/interpret.py`, which never accept floats on
//! the data stack.

use super::Vm;
use crate::error::InterpError;
use crate::operand::Operand;
use crate::value::Value;

#[derive(Clone, Copy)]
pub(super) enum ArithKind {
    Add,
    Sub,
    Mul,
    Div,
    IDiv,
}

#[derive(Clone, Copy)]
pub(super) enum CmpKind {
    Lt,
    Gt,
    Eq,
}

#[derive(Clone, Copy)]
pub(super) enum LogicKind {
    And,
    Or,
    Not,
}

fn apply_arith(kind: ArithKind, a: Value, b: Value) -> Result<Value, InterpError> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => match kind {
            ArithKind::Add => Ok(Value::Int(x.wrapping_add(y))),
            ArithKind::Sub => Ok(Value::Int(x.wrapping_sub(y))),
            ArithKind::Mul => Ok(Value::Int(x.wrapping_mul(y))),
            ArithKind::IDiv => {
                if y == 0 {
                    Err(InterpError::BadNumericDomain("integer division by zero".to_string()))
                } else {
                    // Floor division, matching the reference's Python `//`; Rust's
                    // native `/` truncates and `div_euclid` is not the same thing.
                    let q = x / y;
                    let floored = if (x % y != 0) && ((x < 0) != (y < 0)) { q - 1 } else { q };
                    Ok(Value::Int(floored))
                }
            }
            ArithKind::Div => Err(InterpError::TypeMismatch("DIV requires float operands".to_string())),
        },
        (Value::Float(x), Value::Float(y)) => match kind {
            ArithKind::Add => Ok(Value::Float(x + y)),
            ArithKind::Sub => Ok(Value::Float(x - y)),
            ArithKind::Mul => Ok(Value::Float(x * y)),
            ArithKind::Div => {
                if y == 0.0 {
                    Err(InterpError::BadNumericDomain("float division by zero".to_string()))
                } else {
                    Ok(Value::Float(x / y))
                }
            }
            ArithKind::IDiv => Err(InterpError::TypeMismatch(
                "IDIV requires integer operands".to_string(),
            )),
        },
        (a, b) => Err(InterpError::TypeMismatch(format!(
            "arithmetic operator requires matching numeric operands, got {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

/// The narrower integer-only arithmetic accepted by the `*S` stack forms.
fn apply_arith_int_only(kind: ArithKind, a: Value, b: Value) -> Result<Value, InterpError> {
    match (&a, &b) {
        (Value::Int(_), Value::Int(_)) => apply_arith(kind, a, b),
        _ => Err(InterpError::TypeMismatch(format!(
            "stack arithmetic requires two integer operands, got {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

pub(super) fn apply_cmp(kind: CmpKind, a: Value, b: Value) -> Result<Value, InterpError> {
    if matches!(kind, CmpKind::Eq) && (a == Value::Nil || b == Value::Nil) {
        return Ok(Value::Bool(a == b));
    }
    if matches!(kind, CmpKind::Lt | CmpKind::Gt) && (a == Value::Nil || b == Value::Nil) {
        return Err(InterpError::TypeMismatch("LT/GT do not accept nil operands".to_string()));
    }
    let ordering = match (&a, &b) {
        (Value::Int(x), Value::Int(y)) => x.partial_cmp(y),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::Str(x), Value::Str(y)) => x.partial_cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.partial_cmp(y),
        _ => {
            return Err(InterpError::TypeMismatch(format!(
                "comparison requires matching operand kinds, got {} and {}",
                a.type_name(),
                b.type_name()
            )))
        }
    };
    let ordering = ordering.ok_or_else(|| InterpError::TypeMismatch("incomparable operands".to_string()))?;
    let result = match kind {
        CmpKind::Lt => ordering.is_lt(),
        CmpKind::Gt => ordering.is_gt(),
        CmpKind::Eq => ordering.is_eq(),
    };
    Ok(Value::Bool(result))
}

pub(super) fn handle_arith(vm: &mut Vm, args: &[Operand], kind: ArithKind) -> Result<(), InterpError> {
    let a = vm.resolve(&args[1])?;
    let b = vm.resolve(&args[2])?;
    let result = apply_arith(kind, a, b)?;
    vm.write_var(&args[0], result)
}

pub(super) fn handle_arith_stack(vm: &mut Vm, kind: ArithKind) -> Result<(), InterpError> {
    let b = vm.pop_stack()?;
    let a = vm.pop_stack()?;
    let result = apply_arith_int_only(kind, a, b)?;
    vm.push_stack(result);
    Ok(())
}

pub(super) fn handle_cmp(vm: &mut Vm, args: &[Operand], kind: CmpKind) -> Result<(), InterpError> {
    let a = vm.resolve(&args[1])?;
    let b = vm.resolve(&args[2])?;
    let result = apply_cmp(kind, a, b)?;
    vm.write_var(&args[0], result)
}

pub(super) fn handle_cmp_stack(vm: &mut Vm, kind: CmpKind) -> Result<(), InterpError> {
    let b = vm.pop_stack()?;
    let a = vm.pop_stack()?;
    let result = apply_cmp(kind, a, b)?;
    vm.push_stack(result);
    Ok(())
}

fn apply_logic(kind: LogicKind, a: Value, b: Option<Value>) -> Result<Value, InterpError> {
    let a = match a {
        Value::Bool(v) => v,
        other => {
            return Err(InterpError::TypeMismatch(format!(
                "logical operator requires bool operands, got {}",
                other.type_name()
            )))
        }
    };
    match kind {
        LogicKind::Not => Ok(Value::Bool(!a)),
        LogicKind::And | LogicKind::Or => {
            let b = match b.expect("and/or require a second operand") {
                Value::Bool(v) => v,
                other => {
                    return Err(InterpError::TypeMismatch(format!(
                        "logical operator requires bool operands, got {}",
                        other.type_name()
                    )))
                }
            };
            Ok(Value::Bool(match kind {
                LogicKind::And => a && b,
                LogicKind::Or => a || b,
                LogicKind::Not => unreachable!(),
            }))
        }
    }
}

pub(super) fn handle_logic(vm: &mut Vm, args: &[Operand], kind: LogicKind) -> Result<(), InterpError> {
    match kind {
        LogicKind::Not => {
            let a = vm.resolve(&args[1])?;
            let result = apply_logic(kind, a, None)?;
            vm.write_var(&args[0], result)
        }
        LogicKind::And | LogicKind::Or => {
            let a = vm.resolve(&args[1])?;
            let b = vm.resolve(&args[2])?;
            let result = apply_logic(kind, a, Some(b))?;
            vm.write_var(&args[0], result)
        }
    }
}

pub(super) fn handle_logic_stack(vm: &mut Vm, kind: LogicKind) -> Result<(), InterpError> {
    match kind {
        LogicKind::Not => {
            let a = vm.pop_stack()?;
            let result = apply_logic(kind, a, None)?;
            vm.push_stack(result);
        }
        LogicKind::And | LogicKind::Or => {
            let b = vm.pop_stack()?;
            let a = vm.pop_stack()?;
            let result = apply_logic(kind, a, Some(b))?;
            vm.push_stack(result);
        }
    }
    Ok(())
}
