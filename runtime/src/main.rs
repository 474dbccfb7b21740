//! IPPcode23 Interpreter entry point.
//!
//! Wires the hand-parsed CLI options to the loader and the VM, translating
//! every [`InterpError`] (including a program's own `EXIT`) into the exact
//! process exit code spec §6 assigns it.
//!
//! Usage:
//!     ippc --source=FILE [--input=FILE] [--stats=FILE [selectors...]]
//!     ippc --input=FILE [--source=FILE] [--stats=FILE [selectors...]]
//!
//! At least one of `--source`/`--input` must be given; whichever is
//! omitted falls back to stdin (for `--source`) or an empty input stream
//! (for `--input`). Stat selector flags (`--insts`, `--hot`, `--vars`,
//! `--frequent`, `--eol`, repeatable `--print=STRING`) require `--stats`.

use std::env;
use std::fs;
use std::io::Read as _;
use std::process;

mod cli;
mod error;
mod frame;
mod hexfloat;
mod io;
mod loader;
mod operand;
mod stats;
mod value;
mod vm;

use error::InterpError;
use io::{FileInput, StdErrSink, StdSink, StdinInput, StringInput};

fn read_source(opts: &cli::Options) -> Result<String, InterpError> {
    match &opts.source {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| InterpError::InputOpen(format!("cannot open source file '{}': {}", path, e))),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| InterpError::InputOpen(format!("cannot read source from stdin: {}", e)))?;
            Ok(buf)
        }
    }
}

fn run_with_options(opts: &cli::Options) -> Result<(), InterpError> {
    let source = read_source(opts)?;
    let instructions = loader::load_program(&source)?;

    let mut stdin_input;
    let mut file_input;
    let mut empty_input;
    let input: &mut dyn io::InputSource = match &opts.input {
        Some(path) => {
            file_input = FileInput::open(path)?;
            &mut file_input
        }
        None if opts.source.is_some() => {
            stdin_input = StdinInput;
            &mut stdin_input
        }
        None => {
            empty_input = StringInput::new("");
            &mut empty_input
        }
    };

    let mut out = StdSink;
    let mut err_out = StdErrSink;
    let snapshot = vm::Vm::new(instructions, input, &mut out, &mut err_out).run()?;

    if let Some(stats_path) = &opts.stats_path {
        let report = cli::render_stats_report(&opts.raw, &snapshot);
        fs::write(stats_path, report)
            .map_err(|e| InterpError::InputOpen(format!("cannot write stats file '{}': {}", stats_path, e)))?;
    }

    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let opts = match cli::parse_args(&args) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(e.exit_code());
        }
    };

    if let Err(e) = run_with_options(&opts) {
        if !matches!(e, InterpError::Exit(_)) {
            eprintln!("{}", e);
        }
        process::exit(e.exit_code());
    }
}
