//! # Error Handling for the IPPcode23 Interpreter
//!
//! This module defines [`InterpError`], the single error type produced by
//! the loader, the frame/stack runtime, and the execution engine.
//!
//! Unlike a host language that raises exceptions and unwinds a call stack,
//! IPPcode23's fault model is exit-code driven: every fault is terminal and
//! maps to one exact process exit code (spec §6/§7). `InterpError` captures
//! that directly — each variant already names the exit code it produces,
//! so there is no separate "category" tier to map through (the reference
//! runtime's `ErrorKind` exists only to round-trip error categories through
//! its on-disk bytecode format; this interpreter has no such format to
//! round-trip through, so that tier is dropped).
//!
//! ## Display
//! Implements [`fmt::Display`] (short category tag plus detail, in the
//! spirit of the reference runtime's `RuntimeError` messages) and
//! [`std::error::Error`] so it composes with `?` throughout the crate.

use std::fmt;

/// A fault raised while loading or executing an IPPcode23 program.
///
/// Each variant corresponds 1:1 to one of the exit codes in spec §6.
#[derive(Debug, PartialEq)]
pub enum InterpError {
    /// Bad CLI usage: missing `--source`/`--input`, or stat selectors
    /// without `--stats`. Exit 10.
    Usage(String),
    /// The `--input` file could not be opened/read. Exit 11.
    InputOpen(String),
    /// The program XML itself was not well-formed XML. Exit 31.
    MalformedXml(String),
    /// Structural/syntax fault in the program: bad root, missing
    /// attributes, unknown opcode, wrong operand arity, bad type-literal.
    /// Exit 32.
    Syntax(String),
    /// Undefined label, duplicate label/variable definition, or an
    /// ill-formed operand (a `var`/`symb` formal bound to the wrong kind
    /// of argument). Exit 52.
    Semantic(String),
    /// Type mismatch in an operation. Exit 53.
    TypeMismatch(String),
    /// Access to an undefined variable in an existing frame. Exit 54.
    UndefinedVariable(String),
    /// Access to a frame that does not currently exist. Exit 55.
    UndefinedFrame(String),
    /// Missing value: empty data/call stack, `EXIT` without a stack
    /// value, or an undefined source for a value producer. Exit 56.
    MissingValue(String),
    /// Numeric operand out of the domain the operation accepts: `EXIT`
    /// outside `[0,49]`, or division by zero. Exit 57.
    BadNumericDomain(String),
    /// String index out of range, or an `INT2CHAR` codepoint with no
    /// Unicode scalar value. Exit 58.
    StringDomain(String),
    /// A program-requested `EXIT` with an in-range code (0-49). Not a
    /// fault: propagated through the same `Result<_, InterpError>` plumbing
    /// as every other terminal condition so the engine has one exit path.
    Exit(i32),
}

impl InterpError {
    /// The process exit code this fault maps to (spec §6).
    pub fn exit_code(&self) -> i32 {
        match self {
            InterpError::Usage(_) => 10,
            InterpError::InputOpen(_) => 11,
            InterpError::MalformedXml(_) => 31,
            InterpError::Syntax(_) => 32,
            InterpError::Semantic(_) => 52,
            InterpError::TypeMismatch(_) => 53,
            InterpError::UndefinedVariable(_) => 54,
            InterpError::UndefinedFrame(_) => 55,
            InterpError::MissingValue(_) => 56,
            InterpError::BadNumericDomain(_) => 57,
            InterpError::StringDomain(_) => 58,
            InterpError::Exit(code) => *code,
        }
    }
}

impl fmt::Display for InterpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpError::Usage(msg) => write!(f, "UsageError: {}", msg),
            InterpError::InputOpen(msg) => write!(f, "InputError: {}", msg),
            InterpError::MalformedXml(msg) => write!(f, "MalformedXmlError: {}", msg),
            InterpError::Syntax(msg) => write!(f, "SyntaxError: {}", msg),
            InterpError::Semantic(msg) => write!(f, "SemanticError: {}", msg),
            InterpError::TypeMismatch(msg) => write!(f, "TypeError: {}", msg),
            InterpError::UndefinedVariable(msg) => write!(f, "UndefinedVariableError: {}", msg),
            InterpError::UndefinedFrame(msg) => write!(f, "UndefinedFrameError: {}", msg),
            InterpError::MissingValue(msg) => write!(f, "MissingValueError: {}", msg),
            InterpError::BadNumericDomain(msg) => write!(f, "NumericDomainError: {}", msg),
            InterpError::StringDomain(msg) => write!(f, "StringDomainError: {}", msg),
            InterpError::Exit(code) => write!(f, "Exit({})", code),
        }
    }
}

impl std::error::Error for InterpError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_spec() {
        assert_eq!(InterpError::Usage("x".into()).exit_code(), 10);
        assert_eq!(InterpError::InputOpen("x".into()).exit_code(), 11);
        assert_eq!(InterpError::MalformedXml("x".into()).exit_code(), 31);
        assert_eq!(InterpError::Syntax("x".into()).exit_code(), 32);
        assert_eq!(InterpError::Semantic("x".into()).exit_code(), 52);
        assert_eq!(InterpError::TypeMismatch("x".into()).exit_code(), 53);
        assert_eq!(InterpError::UndefinedVariable("x".into()).exit_code(), 54);
        assert_eq!(InterpError::UndefinedFrame("x".into()).exit_code(), 55);
        assert_eq!(InterpError::MissingValue("x".into()).exit_code(), 56);
        assert_eq!(InterpError::BadNumericDomain("x".into()).exit_code(), 57);
        assert_eq!(InterpError::StringDomain("x".into()).exit_code(), 58);
        assert_eq!(InterpError::Exit(7).exit_code(), 7);
        assert_eq!(InterpError::Exit(0).exit_code(), 0);
    }
}
