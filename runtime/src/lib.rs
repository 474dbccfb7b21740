//! # IPPcode23 Runtime
//!
//! A library embedding of the IPPcode23 interpreter, usable outside the
//! `ippc` CLI. The `runtime-wasm` crate wraps this entry point for a
//! browser embedding.

pub mod cli;
pub mod error;
pub mod frame;
pub mod hexfloat;
pub mod io;
pub mod loader;
pub mod operand;
pub mod stats;
pub mod value;
mod vm;

use error::InterpError;
use io::{InputSource, OutputSink};
use stats::StatsSnapshot;

/// Load and run an IPPcode23 program from its XML source text, returning
/// the final statistics snapshot on success.
pub fn run(
    source_xml: &str,
    input: &mut dyn InputSource,
    out: &mut dyn OutputSink,
    err_out: &mut dyn OutputSink,
) -> Result<StatsSnapshot, InterpError> {
    let instructions = loader::load_program(source_xml)?;
    vm::Vm::new(instructions, input, out, err_out).run()
}
