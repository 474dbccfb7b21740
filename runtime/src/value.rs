//! # Value Representation for the IPPcode23 VM
//!
//! This module defines [`Value`], the runtime type every variable slot,
//! literal, and data-stack entry holds.
//!
//! ## Supported kinds
//! - `Int(i64)` — 64-bit signed integer
//! - `Float(f64)` — IEEE-754 double, round-tripped through hex-float text
//! - `Bool(bool)` — boolean truth value
//! - `Str(String)` — logical codepoint sequence (escapes already decoded)
//! - `Nil` — the singleton `nil`
//! - `Undef` — a `DEFVAR`'d slot that has never been written
//!
//! ## Design
//! Unlike a dynamically-typed host language, every opcode here demands an
//! *exact* kind for each operand (see `vm::ops_*`); there is no implicit
//! coercion table on `Value` itself. The only conversions this type
//! performs are ones every opcode needs regardless of caller: naming its
//! own kind (`TYPE`) and rendering itself for `WRITE`/`DPRINT`.

use crate::hexfloat;

/// Runtime value held by a variable slot, a literal operand, or a data-stack entry.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// 64-bit signed integer.
    Int(i64),
    /// IEEE-754 double-precision float.
    Float(f64),
    /// Boolean truth value.
    Bool(bool),
    /// UTF-8 string, escapes already decoded at load time.
    Str(String),
    /// The `nil` singleton.
    Nil,
    /// An uninitialized variable slot (result of `DEFVAR`, never written).
    Undef,
}

impl Value {
    /// The type name as used by the `TYPE` instruction. `Undef` has no
    /// type name (empty string, per spec).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Nil => "nil",
            Value::Undef => "",
        }
    }

    /// Render this value the way `WRITE` does: `true`/`false` for booleans,
    /// empty string for `nil`, hex-float text for floats, decimal for ints,
    /// the string verbatim otherwise. `Undef` should never reach `WRITE`
    /// (callers reject it earlier); it renders as empty for safety.
    pub fn display_for_write(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Float(f) => hexfloat::format_hex_float(*f),
            Value::Bool(b) => {
                if *b {
                    "true".to_string()
                } else {
                    "false".to_string()
                }
            }
            Value::Str(s) => s.clone(),
            Value::Nil => String::new(),
            Value::Undef => String::new(),
        }
    }

    /// Render this value for `DPRINT`/`BREAK` diagnostics. Uses the same
    /// rendering as `WRITE`.
    pub fn display_for_diagnostic(&self) -> String {
        self.display_for_write()
    }

    pub fn is_undef(&self) -> bool {
        matches!(self, Value::Undef)
    }
}
