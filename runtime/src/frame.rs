//! # Frame / Variable-Scope Runtime State
//!
//! Implements the global/temporary/local frame model of spec §3/§4.3:
//! `GF` always exists, `TF` is present-or-absent, and `LF` aliases the top
//! of a separate frame stack. This mirrors how the reference runtime keeps
//! its `env`/`env_stack`/`globals` as plain owned maps inside the VM rather
//! than sharing ownership between them (`vm.rs`'s `mem::take(env)` push/pop
//! dance on call/return is the same shape as `push_frame`/`pop_frame`
//! below), generalized here to three named scopes instead of two.

use std::collections::HashMap;

use crate::error::InterpError;
use crate::value::Value;

pub type FrameMap = HashMap<String, Value>;

/// Owns the three frame scopes and the frame stack, and resolves
/// `FRAME@NAME` variable references against them.
#[derive(Default)]
pub struct Frames {
    global: FrameMap,
    local: Option<FrameMap>,
    temporary: Option<FrameMap>,
    stack: Vec<Option<FrameMap>>,
}

impl Frames {
    pub fn new() -> Self {
        Self::default()
    }

    /// `CREATEFRAME`: replace `TF` with a fresh empty frame.
    pub fn create_frame(&mut self) {
        self.temporary = Some(FrameMap::new());
    }

    /// `PUSHFRAME`: `TF` becomes the new `LF`; the old `LF` is pushed onto
    /// the frame stack. Requires `TF` to be present.
    pub fn push_frame(&mut self) -> Result<(), InterpError> {
        let tf = self
            .temporary
            .take()
            .ok_or_else(|| InterpError::UndefinedFrame("PUSHFRAME: no temporary frame".to_string()))?;
        self.stack.push(self.local.take());
        self.local = Some(tf);
        Ok(())
    }

    /// `POPFRAME`: `LF` becomes the new `TF`; the frame stack's top becomes
    /// the new `LF`. Requires a non-empty frame stack.
    pub fn pop_frame(&mut self) -> Result<(), InterpError> {
        let popped = self
            .stack
            .pop()
            .ok_or_else(|| InterpError::UndefinedFrame("POPFRAME: frame stack is empty".to_string()))?;
        self.temporary = self.local.take();
        self.local = popped;
        Ok(())
    }

    fn frame_mut(&mut self, frame: &str) -> Result<&mut FrameMap, InterpError> {
        match frame {
            "GF" => Ok(&mut self.global),
            "LF" => self
                .local
                .as_mut()
                .ok_or_else(|| InterpError::UndefinedFrame("LF does not exist".to_string())),
            "TF" => self
                .temporary
                .as_mut()
                .ok_or_else(|| InterpError::UndefinedFrame("TF does not exist".to_string())),
            other => Err(InterpError::Semantic(format!("unknown frame '{}'", other))),
        }
    }

    fn frame_ref(&self, frame: &str) -> Result<&FrameMap, InterpError> {
        match frame {
            "GF" => Ok(&self.global),
            "LF" => self
                .local
                .as_ref()
                .ok_or_else(|| InterpError::UndefinedFrame("LF does not exist".to_string())),
            "TF" => self
                .temporary
                .as_ref()
                .ok_or_else(|| InterpError::UndefinedFrame("TF does not exist".to_string())),
            other => Err(InterpError::Semantic(format!("unknown frame '{}'", other))),
        }
    }

    /// `DEFVAR FRAME@NAME`: create a fresh `Undef` slot. Errors if the
    /// frame doesn't exist (55) or the name is already defined (52).
    pub fn define(&mut self, frame: &str, name: &str) -> Result<(), InterpError> {
        let map = self.frame_mut(frame)?;
        if map.contains_key(name) {
            return Err(InterpError::Semantic(format!(
                "variable '{}@{}' already defined",
                frame, name
            )));
        }
        map.insert(name.to_string(), Value::Undef);
        Ok(())
    }

    /// Read a variable's value. Errors on missing frame (55), missing name
    /// (54). Does *not* reject `Undef` here — most callers must do that
    /// themselves (every opcode except `TYPE`), matching spec §4.3.
    pub fn read(&self, frame: &str, name: &str) -> Result<&Value, InterpError> {
        let map = self.frame_ref(frame)?;
        map.get(name)
            .ok_or_else(|| InterpError::UndefinedVariable(format!("variable '{}@{}' is not defined", frame, name)))
    }

    /// Write a variable's value. The slot must already exist (created via
    /// `DEFVAR`); errors on missing frame (55) or missing name (54).
    pub fn write(&mut self, frame: &str, name: &str, value: Value) -> Result<(), InterpError> {
        let map = self.frame_mut(frame)?;
        if !map.contains_key(name) {
            return Err(InterpError::UndefinedVariable(format!(
                "variable '{}@{}' is not defined",
                frame, name
            )));
        }
        map.insert(name.to_string(), value);
        Ok(())
    }

    /// Total number of defined slots across every frame that currently
    /// exists (`GF` plus `LF`/`TF` if present). Used by the `vars`
    /// statistic (spec §4.5): counts slots regardless of whether they hold
    /// `Undef` or an assigned value.
    pub fn live_slot_count(&self) -> usize {
        self.global.len()
            + self.local.as_ref().map_or(0, |f| f.len())
            + self.temporary.as_ref().map_or(0, |f| f.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushframe_without_tf_errors() {
        let mut f = Frames::new();
        assert_eq!(f.push_frame().unwrap_err().exit_code(), 55);
    }

    #[test]
    fn popframe_without_stack_errors() {
        let mut f = Frames::new();
        assert_eq!(f.pop_frame().unwrap_err().exit_code(), 55);
    }

    #[test]
    fn round_trip_create_push_pop_preserves_depth() {
        let mut f = Frames::new();
        f.create_frame();
        f.define("TF", "x").unwrap();
        f.write("TF", "x", Value::Int(5)).unwrap();
        f.push_frame().unwrap();
        assert_eq!(f.read("LF", "x").unwrap(), &Value::Int(5));
        f.pop_frame().unwrap();
        assert_eq!(f.read("TF", "x").unwrap(), &Value::Int(5));
        assert!(f.stack.is_empty());
    }

    #[test]
    fn redefine_in_same_frame_errors() {
        let mut f = Frames::new();
        f.define("GF", "x").unwrap();
        assert_eq!(f.define("GF", "x").unwrap_err().exit_code(), 52);
    }

    #[test]
    fn read_missing_variable_errors_54() {
        let f = Frames::new();
        assert_eq!(f.read("GF", "nope").unwrap_err().exit_code(), 54);
    }

    #[test]
    fn read_missing_frame_errors_55() {
        let f = Frames::new();
        assert_eq!(f.read("LF", "x").unwrap_err().exit_code(), 55);
    }
}
