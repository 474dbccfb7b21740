//! # Stack-Based Virtual Machine (Runtime)
//!
//! Executes the ordered [`Instruction`] list produced by the loader against
//! the three-scope frame model, a data stack, and a call stack.
//!
//! ## High-level model
//! - **Data stack (`data_stack`)**: operand stack for the `*S` stack-form
//!   opcodes (`PUSHS`/`POPS`/`ADDS`/...).
//! - **Frames (`frames`)**: `GF`/`LF`/`TF` variable storage (see [`crate::frame`]).
//! - **Call stack (`call_stack`)**: return positions for `CALL`/`RETURN`.
//! - **Program counter (`pc`)**: index into `instructions` (not `order` —
//!   `order` only fixes the execution sequence at load time).
//! - **Advance flag**: control-flow ops that set `pc` themselves disable the
//!   main loop's automatic `pc += 1`, the same shape the reference runtime
//!   uses for its own jump/call instructions.
//!
//! `RETURN` deliberately does *not* add 1 to the restored position itself —
//! it leaves `advance_pc` at its default `true` so the main loop's ordinary
//! post-step increment produces the correct "resume after the call"
//! position. This mirrors `instr_return` in
//! `examples/original_source/interpret.py`, which relies on the same
//! outer-loop increment rather than doing the arithmetic locally.

use std::collections::HashMap;

use crate::error::InterpError;
use crate::frame::Frames;
use crate::io::{InputSource, OutputSink};
use crate::loader::Instruction;
use crate::operand::{split_var, Operand};
use crate::stats::{Stats, StatsSnapshot};
use crate::value::Value;

mod ops_arith;
mod ops_control;
mod ops_strings;

pub struct Vm<'a> {
    instructions: Vec<Instruction>,
    labels: HashMap<String, usize>,
    frames: Frames,
    data_stack: Vec<Value>,
    call_stack: Vec<usize>,
    pc: usize,
    stats: Stats,
    input: &'a mut dyn InputSource,
    out: &'a mut dyn OutputSink,
    err_out: &'a mut dyn OutputSink,
}

/// Opcodes that take no arguments and don't touch stacks/frames on their
/// own pass through the pre-validation arity check; everything else is
/// validated against this table before execution begins (spec §4.4's
/// "ill-formed operand" checks start with arity).
fn expected_arity(opcode: &str) -> Option<usize> {
    Some(match opcode {
        "CREATEFRAME" | "PUSHFRAME" | "POPFRAME" | "RETURN" | "BREAK" => 0,
        // Stack-only forms: both operands already live on the data stack.
        "CLEARS" | "ADDS" | "SUBS" | "MULS" | "IDIVS" | "LTS" | "GTS" | "EQS" | "ANDS" | "ORS"
        | "NOTS" | "INT2CHARS" | "STRI2INTS" => 0,
        "DEFVAR" | "POPS" | "PUSHS" | "WRITE" | "LABEL" | "JUMP" | "CALL" | "EXIT" | "DPRINT"
        | "JUMPIFEQS" | "JUMPIFNEQS" => 1,
        "MOVE" | "INT2CHAR" | "STRLEN" | "TYPE" | "NOT" | "INT2FLOAT" | "FLOAT2INT" | "READ" => 2,
        "ADD" | "SUB" | "MUL" | "DIV" | "IDIV" | "LT" | "GT" | "EQ" | "AND" | "OR" | "CONCAT"
        | "GETCHAR" | "SETCHAR" | "STRI2INT" | "JUMPIFEQ" | "JUMPIFNEQ" => 3,
        _ => return None,
    })
}

impl<'a> Vm<'a> {
    pub fn new(
        instructions: Vec<Instruction>,
        input: &'a mut dyn InputSource,
        out: &'a mut dyn OutputSink,
        err_out: &'a mut dyn OutputSink,
    ) -> Self {
        Self {
            instructions,
            labels: HashMap::new(),
            frames: Frames::new(),
            data_stack: Vec::new(),
            call_stack: Vec::new(),
            pc: 0,
            stats: Stats::new(),
            input,
            out,
            err_out,
        }
    }

    fn build_labels(&mut self) -> Result<(), InterpError> {
        for (idx, instr) in self.instructions.iter().enumerate() {
            if instr.opcode.eq_ignore_ascii_case("LABEL") {
                let name = match instr.args.first() {
                    Some(Operand::Label(name)) => name.clone(),
                    _ => return Err(InterpError::Syntax("LABEL requires a label argument".to_string())),
                };
                if self.labels.insert(name.clone(), idx).is_some() {
                    return Err(InterpError::Semantic(format!("duplicate label '{}'", name)));
                }
            }
        }
        Ok(())
    }

    fn validate_arity(&self) -> Result<(), InterpError> {
        for instr in &self.instructions {
            let opcode = instr.opcode.to_ascii_uppercase();
            match expected_arity(&opcode) {
                Some(n) if n == instr.args.len() => {}
                Some(n) => {
                    return Err(InterpError::Syntax(format!(
                        "{} expects {} operand(s), got {}",
                        opcode,
                        n,
                        instr.args.len()
                    )))
                }
                None => return Err(InterpError::Syntax(format!("unknown opcode '{}'", opcode))),
            }
        }
        Ok(())
    }

    /// Run the loaded program to completion, returning the final statistics
    /// snapshot. `Exit` and every fault variant of [`InterpError`] both
    /// flow back through the same `Result`.
    pub fn run(mut self) -> Result<StatsSnapshot, InterpError> {
        self.build_labels()?;
        self.validate_arity()?;
        self.stats
            .seed_static_counts(self.instructions.iter().map(|i| i.opcode.as_str()));

        let opcode_by_order: HashMap<i64, String> = self
            .instructions
            .iter()
            .map(|i| (i.order, i.opcode.to_ascii_uppercase()))
            .collect();

        while self.pc < self.instructions.len() {
            let order = self.instructions[self.pc].order;
            self.stats.record_visit(order);
            self.stats.observe_var_count(self.frames.live_slot_count());

            let opcode = self.instructions[self.pc].opcode.to_ascii_uppercase();
            let args = self.instructions[self.pc].args.clone();
            let mut advance = true;

            self.execute(&opcode, &args, &mut advance)?;
            self.stats.record_executed(&opcode);

            if advance {
                self.pc += 1;
            }
        }

        Ok(std::mem::take(&mut self.stats).finish(&opcode_by_order))
    }

    fn execute(&mut self, opcode: &str, args: &[Operand], advance: &mut bool) -> Result<(), InterpError> {
        use ops_arith::{ArithKind, CmpKind, LogicKind};

        match opcode {
            "MOVE" => ops_control::handle_move(self, args),
            "CREATEFRAME" => {
                self.frames.create_frame();
                Ok(())
            }
            "PUSHFRAME" => self.frames.push_frame(),
            "POPFRAME" => self.frames.pop_frame(),
            "DEFVAR" => ops_control::handle_defvar(self, args),
            "CALL" => ops_control::handle_call(self, args, advance),
            "RETURN" => ops_control::handle_return(self, advance),
            "PUSHS" => ops_control::handle_pushs(self, args),
            "POPS" => ops_control::handle_pops(self, args),
            "CLEARS" => {
                self.data_stack.clear();
                Ok(())
            }
            "LABEL" => Ok(()),
            "JUMP" => ops_control::handle_jump(self, args, advance),
            "JUMPIFEQ" => ops_control::handle_jumpif(self, args, advance, false),
            "JUMPIFNEQ" => ops_control::handle_jumpif(self, args, advance, true),
            "JUMPIFEQS" => ops_control::handle_jumpifs(self, args, advance, false),
            "JUMPIFNEQS" => ops_control::handle_jumpifs(self, args, advance, true),
            "EXIT" => ops_control::handle_exit(self, args),
            "BREAK" => ops_control::handle_break(self),

            "ADD" => ops_arith::handle_arith(self, args, ArithKind::Add),
            "SUB" => ops_arith::handle_arith(self, args, ArithKind::Sub),
            "MUL" => ops_arith::handle_arith(self, args, ArithKind::Mul),
            "DIV" => ops_arith::handle_arith(self, args, ArithKind::Div),
            "IDIV" => ops_arith::handle_arith(self, args, ArithKind::IDiv),
            "ADDS" => ops_arith::handle_arith_stack(self, ArithKind::Add),
            "SUBS" => ops_arith::handle_arith_stack(self, ArithKind::Sub),
            "MULS" => ops_arith::handle_arith_stack(self, ArithKind::Mul),
            "IDIVS" => ops_arith::handle_arith_stack(self, ArithKind::IDiv),

            "LT" => ops_arith::handle_cmp(self, args, CmpKind::Lt),
            "GT" => ops_arith::handle_cmp(self, args, CmpKind::Gt),
            "EQ" => ops_arith::handle_cmp(self, args, CmpKind::Eq),
            "LTS" => ops_arith::handle_cmp_stack(self, CmpKind::Lt),
            "GTS" => ops_arith::handle_cmp_stack(self, CmpKind::Gt),
            "EQS" => ops_arith::handle_cmp_stack(self, CmpKind::Eq),

            "AND" => ops_arith::handle_logic(self, args, LogicKind::And),
            "OR" => ops_arith::handle_logic(self, args, LogicKind::Or),
            "NOT" => ops_arith::handle_logic(self, args, LogicKind::Not),
            "ANDS" => ops_arith::handle_logic_stack(self, LogicKind::And),
            "ORS" => ops_arith::handle_logic_stack(self, LogicKind::Or),
            "NOTS" => ops_arith::handle_logic_stack(self, LogicKind::Not),

            "INT2CHAR" => ops_strings::handle_int2char(self, args),
            "STRI2INT" => ops_strings::handle_stri2int(self, args),
            "INT2CHARS" => ops_strings::handle_int2chars(self),
            "STRI2INTS" => ops_strings::handle_stri2ints(self),
            "INT2FLOAT" => ops_strings::handle_int2float(self, args),
            "FLOAT2INT" => ops_strings::handle_float2int(self, args),

            "READ" => ops_strings::handle_read(self, args),
            "WRITE" => ops_strings::handle_write(self, args),
            "DPRINT" => ops_strings::handle_dprint(self, args),
            "TYPE" => ops_strings::handle_type(self, args),
            "CONCAT" => ops_strings::handle_concat(self, args),
            "STRLEN" => ops_strings::handle_strlen(self, args),
            "GETCHAR" => ops_strings::handle_getchar(self, args),
            "SETCHAR" => ops_strings::handle_setchar(self, args),

            other => Err(InterpError::Syntax(format!("unknown opcode '{}'", other))),
        }
    }

    // --- Shared helpers used by the ops_* submodules ---

    pub(self) fn pop_stack(&mut self) -> Result<Value, InterpError> {
        self.data_stack
            .pop()
            .ok_or_else(|| InterpError::MissingValue("data stack is empty".to_string()))
    }

    pub(self) fn push_stack(&mut self, v: Value) {
        self.data_stack.push(v);
    }

    /// Resolve an operand to a concrete value. Rejects `Undef` — every
    /// opcode except `TYPE` treats reading an undefined variable's value as
    /// a missing-value fault (spec §4.3/§4.4).
    pub(self) fn resolve(&self, op: &Operand) -> Result<Value, InterpError> {
        let v = self.resolve_allow_undef(op)?;
        if v.is_undef() {
            return Err(InterpError::MissingValue("value is undefined".to_string()));
        }
        Ok(v)
    }

    pub(self) fn resolve_allow_undef(&self, op: &Operand) -> Result<Value, InterpError> {
        match op {
            Operand::Literal(v) => Ok(v.clone()),
            Operand::Var(raw) => {
                let (frame, name) = Self::var_parts(raw)?;
                self.frames.read(frame, name).cloned()
            }
            Operand::Label(_) => Err(InterpError::Semantic("expected a value, found a label".to_string())),
            Operand::TypeLiteral(_) => {
                Err(InterpError::Semantic("expected a value, found a type literal".to_string()))
            }
        }
    }

    pub(self) fn var_parts(raw: &str) -> Result<(&str, &str), InterpError> {
        split_var(raw).ok_or_else(|| InterpError::Semantic(format!("ill-formed variable '{}'", raw)))
    }

    pub(self) fn write_var(&mut self, op: &Operand, value: Value) -> Result<(), InterpError> {
        match op {
            Operand::Var(raw) => {
                let (frame, name) = Self::var_parts(raw)?;
                self.frames.write(frame, name, value)
            }
            _ => Err(InterpError::Semantic("expected a variable operand".to_string())),
        }
    }

    pub(self) fn label_target(&self, op: &Operand) -> Result<usize, InterpError> {
        match op {
            Operand::Label(name) => self
                .labels
                .get(name)
                .copied()
                .ok_or_else(|| InterpError::Semantic(format!("undefined label '{}'", name))),
            _ => Err(InterpError::Semantic("expected a label operand".to_string())),
        }
    }

    pub(self) fn type_literal<'op>(op: &'op Operand) -> Result<&'op str, InterpError> {
        match op {
            Operand::TypeLiteral(name) => Ok(name.as_str()),
            _ => Err(InterpError::Syntax("expected a type literal operand".to_string())),
        }
    }
}
